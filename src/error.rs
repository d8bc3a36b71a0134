//! Error types for hk operations.
//!
//! This module defines [`HkError`], the primary error type used throughout
//! the client, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Usage and app-resolution errors are reported at the dispatch boundary
//!   with exit code 2 (see [`HkError::exit_code`])
//! - Credential store, plugin execution and API failures are fatal (exit 1)
//! - Use `anyhow::Error` (via `HkError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for usage and resolution errors.
pub const EXIT_USAGE: i32 = 2;

/// Exit code for fatal errors.
pub const EXIT_FATAL: i32 = 1;

/// Core error type for hk operations.
#[derive(Debug, Error)]
pub enum HkError {
    /// The credential file could not be parsed.
    #[error("{path}:{line}: {message}")]
    NetrcParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The credential file could not be written.
    #[error("failed to write {path}: {source}")]
    NetrcWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A credential value cannot be represented in the credential file.
    #[error("invalid {field} value: must be non-empty and contain no whitespace")]
    InvalidCredential { field: &'static str },

    /// No credentials are known for the API host.
    #[error("not logged in to {host}; run `hk login`")]
    NotLoggedIn { host: String },

    /// No app could be determined from any source.
    #[error("no app specified")]
    NoApp,

    /// More than one app is reachable through git remotes.
    #[error("multiple apps in git remotes: {}", .candidates.join(", "))]
    AmbiguousApp { candidates: Vec<String> },

    /// Neither a built-in command nor a plugin matched.
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// A plugin was found but could not be executed.
    #[error("exec error: {path}: {source}")]
    PluginExec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Platform API returned an error response.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Platform API could not be reached.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A git invocation failed.
    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HkError {
    /// Whether the error stems from how the tool was invoked rather than
    /// from a failure while running.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NoApp | Self::AmbiguousApp { .. } | Self::UnknownCommand { .. }
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            EXIT_USAGE
        } else {
            EXIT_FATAL
        }
    }
}

/// Result type alias for hk operations.
pub type Result<T> = std::result::Result<T, HkError>;
