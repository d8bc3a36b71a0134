//! hk - a fast command-line client for the Heroku platform API.
//!
//! The library holds everything but the process entry point: the command
//! registry and dispatcher, app resolution from flags, environment and git
//! remotes, the netrc-backed credential store and the plugin protocol.
//!
//! # Modules
//!
//! - [`api`] - Blocking client for the platform API
//! - [`cli`] - Command registry, dispatch and built-in commands
//! - [`config`] - Process configuration read from the environment
//! - [`context`] - Per-invocation state and app resolution
//! - [`creds`] - Credential store over the netrc file
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git remote inspection
//! - [`netrc`] - Netrc parsing and serialization
//! - [`plugin`] - Plugin discovery and execution
//! - [`ui`] - Terminal output, prompts and tables
//!
//! # Example
//!
//! ```
//! use hk::git::{GitHost, RemoteInspector, StaticRemotes};
//!
//! let remotes = StaticRemotes::new().with_remote("heroku", "git@heroku.com:myapp.git");
//! let host = GitHost::new("heroku.com");
//! let inspector = RemoteInspector::new(&remotes, &host);
//! assert_eq!(inspector.app_from_any_remote().unwrap(), "myapp");
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod creds;
pub mod error;
pub mod git;
pub mod netrc;
pub mod plugin;
pub mod ui;

pub use error::{HkError, Result};
