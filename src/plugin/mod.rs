//! External plugin discovery and execution.
//!
//! A plugin for command `foo` is an executable named `hk-foo` found in one of
//! the `HKPATH` directories or, failing that, on `PATH`. The first regular,
//! executable file wins.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::context::Context;
use crate::error::{HkError, Result};

/// File name prefix for plugin executables.
pub const PLUGIN_PREFIX: &str = "hk-";

/// Executable file name for a plugin command.
pub fn plugin_file_name(command: &str) -> String {
    format!("{PLUGIN_PREFIX}{command}")
}

/// Locates plugin executables.
#[derive(Debug, Clone)]
pub struct PluginResolver {
    dirs: Vec<PathBuf>,
}

impl PluginResolver {
    /// Search `dirs` in order.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Plugin directories followed by the search path.
    pub fn from_config(config: &Config) -> Self {
        let mut dirs = config.plugin_path.clone();
        for dir in &config.search_path {
            if !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }
        Self::new(dirs)
    }

    /// Directories searched, in order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Path to the plugin implementing `command`, if any.
    ///
    /// Names that are empty or contain a path separator never resolve.
    pub fn find_plugin(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() || command.contains(std::path::is_separator) {
            tracing::debug!("Refusing plugin lookup for {command:?}");
            return None;
        }

        let found = resolve_executable(&plugin_file_name(command), &self.dirs);
        match &found {
            Some(path) => tracing::debug!("Plugin {command} found at {}", path.display()),
            None => tracing::debug!("No plugin for {command} in {:?}", self.dirs),
        }
        found
    }
}

/// Whether a file is executable by permission bits.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// First regular executable file named `name` in `dirs`.
pub fn resolve_executable(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// How a plugin process is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStrategy {
    /// Replace the current process image. Never returns on success.
    Replace,
    /// Run as a child, wait, and report its exit code.
    Spawn,
}

impl Default for ExecStrategy {
    fn default() -> Self {
        if cfg!(unix) {
            Self::Replace
        } else {
            Self::Spawn
        }
    }
}

/// Extra environment passed to plugins.
///
/// `HKAPP` and `HKUSER`/`HKPASS` are only set when they resolve without error.
pub fn plugin_env(ctx: &Context) -> Vec<(String, String)> {
    let config = ctx.config();
    let mut env = vec![
        ("HKHOST".to_string(), config.api_host().to_string()),
        (
            crate::config::API_URL_ENV.to_string(),
            config.api_url.to_string(),
        ),
    ];

    match ctx.resolve_app(None) {
        Ok(app) => env.push((crate::config::APP_ENV.to_string(), app)),
        Err(e) => tracing::debug!("No app for plugin: {e}"),
    }

    if let Ok(creds) = ctx.api_credentials() {
        env.push(("HKUSER".to_string(), creds.login));
        env.push(("HKPASS".to_string(), creds.password));
    }

    env
}

/// Run the plugin at `path`.
///
/// `argv[0]` is the command name the user typed and becomes the plugin's
/// `argv[0]`; the rest are passed through byte for byte. With
/// [`ExecStrategy::Replace`] this only returns on failure.
pub fn exec_plugin(
    path: &Path,
    argv: &[OsString],
    env: &[(String, String)],
    strategy: ExecStrategy,
) -> Result<i32> {
    let exec_err = |source: std::io::Error| HkError::PluginExec {
        path: path.to_path_buf(),
        source,
    };

    let mut cmd = Command::new(path);
    cmd.args(argv.iter().skip(1));
    cmd.envs(env.iter().map(|(k, v)| (k, v)));

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        if let Some(arg0) = argv.first() {
            cmd.arg0(arg0);
        }
    }

    tracing::debug!("Executing plugin {} ({strategy:?})", path.display());

    match strategy {
        #[cfg(unix)]
        ExecStrategy::Replace => {
            use std::os::unix::process::CommandExt;
            Err(exec_err(cmd.exec()))
        }
        #[cfg(not(unix))]
        ExecStrategy::Replace => spawn_and_wait(&mut cmd).map_err(exec_err),
        ExecStrategy::Spawn => spawn_and_wait(&mut cmd).map_err(exec_err),
    }
}

fn spawn_and_wait(cmd: &mut Command) -> std::io::Result<i32> {
    let status = cmd.status()?;
    if let Some(code) = status.code() {
        return Ok(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Ok(128 + signal);
        }
    }

    Ok(1)
}
