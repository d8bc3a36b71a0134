//! Command-line interface for hk.
//!
//! # Architecture
//!
//! - [`registry`] - Command table, flag schemas and usage lines
//! - [`dispatcher`] - Routing argv to a built-in command or plugin
//! - [`commands`] - Built-in command implementations
//! - [`usage`] - Top-level and `help more` listings
//! - [`suggest`] - "Possible alternatives" for mistyped commands

pub mod commands;
pub mod dispatcher;
pub mod registry;
pub mod suggest;
pub mod usage;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{command_name, Dispatcher};
pub use registry::{CommandResult, CommandSpec, Invocation, Registry};
