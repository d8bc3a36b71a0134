//! Built-in command implementations.
//!
//! Each submodule exposes `CommandSpec` constants; [`builtin`] lists them in
//! the order `hk help` shows them.

pub mod apps;
pub mod auth;
pub mod help;
pub mod releases;
pub mod version;
pub mod which_app;

use super::registry::CommandSpec;

/// Every built-in command and help topic, in listing order.
pub fn builtin() -> Vec<CommandSpec> {
    vec![
        apps::CREATE,
        apps::APPS,
        releases::RELEASES,
        releases::RELEASE_INFO,
        releases::ROLLBACK,
        apps::INFO,
        auth::LOGIN,
        auth::LOGOUT,
        help::HELP,
        version::VERSION,
        help::ENVIRON,
        help::PLUGINS,
        help::MORE,
        // listed by `hk help more`
        auth::CREDS,
        which_app::WHICH_APP,
    ]
}
