//! Credential store backed by the netrc file.
//!
//! The store is loaded once at process start. Every mutation rewrites the
//! whole file through a temp file in the same directory that is renamed over
//! the original, so readers only ever observe the old or the new version.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::{HkError, Result};
use crate::netrc::Netrc;

/// Login and password for a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

/// Machine credentials persisted in a netrc file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    netrc: Netrc,
}

impl CredentialStore {
    /// Load the store from `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No credential file at {}", path.display());
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        let netrc = Netrc::parse(&content).map_err(|e| HkError::NetrcParse {
            path: path.clone(),
            line: e.line,
            message: e.message,
        })?;

        Ok(Self { path, netrc })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Credentials recorded for `host`, falling back to the `default` record.
    pub fn credentials_for(&self, host: &str) -> Option<Credentials> {
        let machine = self.netrc.find_machine(host)?;
        Some(Credentials {
            login: machine.login.unwrap_or_default(),
            password: machine.password?,
        })
    }

    /// Credentials for a URL. User-info embedded in the URL wins over the
    /// file and is returned without consulting it.
    pub fn credentials_for_url(&self, url: &Url) -> Option<Credentials> {
        if let Some(creds) = url_credentials(url) {
            return Some(creds);
        }
        url.host_str().and_then(|host| self.credentials_for(host))
    }

    /// Set login and password for `host` and persist the file.
    pub fn upsert(&mut self, host: &str, login: &str, password: &str) -> Result<()> {
        let mut updated = self.netrc.clone();
        updated
            .set_credentials(host, login, password)
            .map_err(|e| HkError::InvalidCredential { field: e.field })?;

        write_atomic(&self.path, &updated.to_string())?;
        tracing::debug!("Saved credentials for {host} to {}", self.path.display());
        self.netrc = updated;
        Ok(())
    }

    /// Remove the record for `host` and persist the file.
    pub fn remove(&mut self, host: &str) -> Result<()> {
        let mut updated = self.netrc.clone();
        if !updated.remove_machine(host) {
            tracing::debug!("No credentials for {host} to remove");
            return Ok(());
        }

        write_atomic(&self.path, &updated.to_string())?;
        tracing::debug!("Removed credentials for {host} from {}", self.path.display());
        self.netrc = updated;
        Ok(())
    }
}

fn url_credentials(url: &Url) -> Option<Credentials> {
    if url.username().is_empty() && url.password().is_none() {
        return None;
    }
    Some(Credentials {
        login: percent_decode(url.username()),
        password: percent_decode(url.password().unwrap_or_default()),
    })
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
            if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() {
                out.push(hex_value(hi) << 4 | hex_value(lo));
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Write `contents` to `path` via temp file + rename, owner-only permissions.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source: std::io::Error| HkError::NetrcWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".netrc")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;

    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600)).map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
