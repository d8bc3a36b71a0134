//! Process configuration derived from the environment.
//!
//! All settings are read once at process start. Lookups go through an
//! injectable closure so tests never touch the real process environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `HKAPP` | default app name |
//! | `NETRC_PATH` | credential file location |
//! | `HEROKU_API_URL` | API base URL (may carry `user:pass@`) |
//! | `HEROKU_GIT_HOST` | platform git domain |
//! | `HKPATH` | plugin directories |
//! | `HKDEBUG` | debug logging |
//!
//! # Example
//!
//! ```
//! use hk::config::Config;
//!
//! let config = Config::from_lookup(|key| match key {
//!     "NETRC_PATH" => Some("/tmp/netrc".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.netrc_path, std::path::PathBuf::from("/tmp/netrc"));
//! assert_eq!(config.api_url.as_str(), "https://api.heroku.com/");
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use reqwest::Url;

use crate::error::Result;

/// Environment variable naming the default app.
pub const APP_ENV: &str = "HKAPP";

/// Environment variable overriding the credential file path.
pub const NETRC_ENV: &str = "NETRC_PATH";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "HEROKU_API_URL";

/// Environment variable overriding the platform git domain.
pub const GIT_HOST_ENV: &str = "HEROKU_GIT_HOST";

/// Environment variable listing plugin directories.
pub const PLUGIN_PATH_ENV: &str = "HKPATH";

/// Environment variable enabling debug logging.
pub const DEBUG_ENV: &str = "HKDEBUG";

/// Boxed environment lookup used by the process context.
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Build an [`EnvLookup`] backed by the real process environment.
pub fn process_env() -> EnvLookup {
    Box::new(|key: &str| std::env::var(key).ok())
}

/// Settings for a single hk invocation.
///
/// `HKAPP` is not captured here; app resolution reads it on demand.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the credential file.
    pub netrc_path: PathBuf,

    /// Base URL of the platform API.
    pub api_url: Url,

    /// Domain that platform git remotes point at.
    pub git_host: String,

    /// Plugin directories, searched before `PATH`.
    pub plugin_path: Vec<PathBuf>,

    /// Inherited executable search path.
    pub search_path: Vec<PathBuf>,
}

impl Config {
    /// Default API base URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.heroku.com";

    /// Default platform git domain.
    pub const DEFAULT_GIT_HOST: &'static str = "heroku.com";

    /// Default plugin directory.
    pub const DEFAULT_PLUGIN_DIR: &'static str = "/usr/local/lib/hk/plugin";

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    /// Read configuration with a custom env var lookup function.
    pub fn from_lookup<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).filter(|v| !v.is_empty());

        let api_url = get(API_URL_ENV).unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url)
            .with_context(|| format!("invalid {API_URL_ENV}: {api_url}"))?;

        let plugin_path = match get(PLUGIN_PATH_ENV) {
            Some(value) => split_path_list(&value),
            None => vec![PathBuf::from(Self::DEFAULT_PLUGIN_DIR)],
        };

        Ok(Self {
            netrc_path: get(NETRC_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_netrc_path),
            api_url,
            git_host: get(GIT_HOST_ENV).unwrap_or_else(|| Self::DEFAULT_GIT_HOST.to_string()),
            plugin_path,
            search_path: get("PATH")
                .map(|value| split_path_list(&value))
                .unwrap_or_default(),
        })
    }

    /// Host component of the API URL.
    pub fn api_host(&self) -> &str {
        self.api_url.host_str().unwrap_or_default()
    }
}

/// Split a `PATH`-style list into directories, dropping empty entries.
pub fn split_path_list(value: &str) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

fn default_netrc_path() -> PathBuf {
    let name = if cfg!(windows) { "_netrc" } else { ".netrc" };
    dirs::home_dir()
        .map(|home| home.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}
