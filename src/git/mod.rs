//! Git remote inspection.
//!
//! Reads the named remotes of the repository in the working directory and
//! maps the ones pointing at the platform's git host to app names. Nothing
//! here is cached: remotes are re-read on every call because a command may
//! add one (e.g. `hk create`) in the same process.

mod host;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

use crate::error::HkError;

pub use host::GitHost;

/// Git config key that pins the remote to use for app detection.
pub const PREFERRED_REMOTE_KEY: &str = "heroku.remote";

/// Source of remote configuration.
pub trait RemoteSource {
    /// Map of remote name to fetch URL. Empty outside a repository.
    fn remotes(&self) -> BTreeMap<String, String>;

    /// Remote pinned via [`PREFERRED_REMOTE_KEY`], if any.
    fn preferred_remote(&self) -> Option<String>;

    /// Add a remote named `name` pointing at `url`.
    fn add_remote(&self, name: &str, url: &str) -> crate::error::Result<()>;
}

/// Reads remotes by shelling out to `git`.
#[derive(Debug, Clone, Default)]
pub struct GitRemotes {
    dir: Option<PathBuf>,
}

impl GitRemotes {
    /// Inspect the repository containing the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the repository containing `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn git_config(&self, args: &[&str]) -> Option<String> {
        let mut cmd = self.git();
        cmd.arg("config").args(args);

        match cmd.output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                tracing::debug!(
                    "git config {:?} exited with {:?}",
                    args,
                    output.status.code()
                );
                None
            }
            Err(e) => {
                tracing::debug!("Could not run git: {e}");
                None
            }
        }
    }
}

impl RemoteSource for GitRemotes {
    fn remotes(&self) -> BTreeMap<String, String> {
        self.git_config(&["--get-regexp", r"^remote\..*\.url$"])
            .map(|out| parse_remote_urls(&out))
            .unwrap_or_default()
    }

    fn preferred_remote(&self) -> Option<String> {
        self.git_config(&[PREFERRED_REMOTE_KEY])
            .map(|out| out.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    fn add_remote(&self, name: &str, url: &str) -> crate::error::Result<()> {
        let git_err = |message: String| HkError::Git {
            command: "remote add".to_string(),
            message,
        };

        let output = self
            .git()
            .args(["remote", "add", name, url])
            .output()
            .map_err(|e| git_err(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(git_err(stderr.trim().to_string()));
        }

        tracing::debug!("Added git remote {name} -> {url}");
        Ok(())
    }
}

/// Fixed set of remotes, for callers that already know them.
#[derive(Debug, Clone, Default)]
pub struct StaticRemotes {
    remotes: RefCell<BTreeMap<String, String>>,
    preferred: Option<String>,
}

impl StaticRemotes {
    /// Create an empty remote set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a remote.
    pub fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes
            .get_mut()
            .insert(name.to_string(), url.to_string());
        self
    }

    /// Pin the preferred remote.
    pub fn with_preferred(mut self, name: &str) -> Self {
        self.preferred = Some(name.to_string());
        self
    }
}

impl RemoteSource for StaticRemotes {
    fn remotes(&self) -> BTreeMap<String, String> {
        self.remotes.borrow().clone()
    }

    fn preferred_remote(&self) -> Option<String> {
        self.preferred.clone()
    }

    fn add_remote(&self, name: &str, url: &str) -> crate::error::Result<()> {
        let mut remotes = self.remotes.borrow_mut();
        if remotes.contains_key(name) {
            return Err(HkError::Git {
                command: "remote add".to_string(),
                message: format!("error: remote {name} already exists."),
            });
        }
        remotes.insert(name.to_string(), url.to_string());
        Ok(())
    }
}

/// Parse `git config --get-regexp` output of `remote.<name>.url <url>` lines.
fn parse_remote_urls(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let (key, url) = line.split_once(char::is_whitespace)?;
            let name = key.strip_prefix("remote.")?.strip_suffix(".url")?;
            Some((name.to_string(), url.trim().to_string()))
        })
        .collect()
}

/// Why no app could be derived from remotes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteLookupError {
    /// The named remote does not exist or does not point at the platform.
    #[error("remote '{remote}' is not a platform git remote")]
    NotAPlatformRemote { remote: String },

    /// No remote points at the platform.
    #[error("no platform git remotes")]
    NoRemotes,

    /// Remotes point at more than one app.
    #[error("multiple apps in git remotes: {}", .candidates.join(", "))]
    Ambiguous { candidates: Vec<String> },
}

/// Derives app names from a [`RemoteSource`].
pub struct RemoteInspector<'a> {
    source: &'a dyn RemoteSource,
    host: &'a GitHost,
}

impl<'a> RemoteInspector<'a> {
    /// Create an inspector over `source` for the given git host.
    pub fn new(source: &'a dyn RemoteSource, host: &'a GitHost) -> Self {
        Self { source, host }
    }

    /// All remotes of the repository.
    pub fn list_remotes(&self) -> BTreeMap<String, String> {
        self.source.remotes()
    }

    /// App named by a single remote.
    pub fn app_from_remote(&self, remote: &str) -> Result<String, RemoteLookupError> {
        self.list_remotes()
            .get(remote)
            .and_then(|url| self.host.app_from_url(url))
            .ok_or_else(|| RemoteLookupError::NotAPlatformRemote {
                remote: remote.to_string(),
            })
    }

    /// The single app that the repository's remotes point at.
    ///
    /// Several remotes naming the same app are fine; remotes naming different
    /// apps are ambiguous and the distinct names are reported sorted.
    pub fn app_from_any_remote(&self) -> Result<String, RemoteLookupError> {
        let remotes = self.list_remotes();
        let apps: BTreeSet<String> = remotes
            .values()
            .filter_map(|url| self.host.app_from_url(url))
            .collect();

        tracing::debug!("Remotes {:?} map to apps {:?}", remotes, apps);

        let mut apps = apps.into_iter();
        match (apps.next(), apps.next()) {
            (None, _) => Err(RemoteLookupError::NoRemotes),
            (Some(app), None) => Ok(app),
            (Some(first), Some(second)) => {
                let candidates = [first, second].into_iter().chain(apps).collect();
                Err(RemoteLookupError::Ambiguous { candidates })
            }
        }
    }

    /// App from the pinned remote, when one is configured and valid.
    pub fn app_from_preferred_remote(&self) -> Option<String> {
        let remote = self.source.preferred_remote()?;
        match self.app_from_remote(&remote) {
            Ok(app) => Some(app),
            Err(e) => {
                tracing::warn!("Ignoring {PREFERRED_REMOTE_KEY}={remote}: {e}");
                None
            }
        }
    }
}
