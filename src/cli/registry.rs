//! Command table.
//!
//! Commands are plain data: a usage line whose first word is the name, help
//! text, whether an app is required, a flag schema and a handler. Entries
//! without a handler are help topics: `hk help <topic>` shows them but they
//! are never dispatched.

use clap::{Arg, ArgAction, ArgMatches};

use crate::context::Context;
use crate::error::{HkError, Result};
use crate::ui::UserInterface;

/// Id of the `-a <app>` flag added to commands that need an app.
pub const APP_FLAG: &str = "app";

/// Id under which positional arguments are collected.
pub const ARGS: &str = "args";

const EXTRA_SUFFIX: &str = " (extra)";

/// Command implementation.
pub type Handler = fn(&Invocation<'_>, &mut Context, &mut dyn UserInterface) -> Result<CommandResult>;

/// Static description of a command or help topic.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Usage line without the `hk` prefix, e.g. `create [-r <region>] [<name>]`.
    pub usage: &'static str,
    pub category: &'static str,
    /// One-line description. A ` (extra)` suffix lists the command only
    /// under `hk help more`.
    pub short: &'static str,
    pub long: &'static str,
    pub needs_app: bool,
    /// Command-specific flags.
    pub flags: fn() -> Vec<Arg>,
    pub run: Option<Handler>,
}

impl CommandSpec {
    /// First word of the usage line.
    pub fn name(&self) -> &'static str {
        self.usage.split(' ').next().unwrap_or(self.usage)
    }

    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    /// Listed by `hk help`.
    pub fn is_listed(&self) -> bool {
        !self.short.is_empty() && !self.is_extra()
    }

    /// Listed by `hk help more`.
    pub fn is_extra(&self) -> bool {
        self.short.ends_with(EXTRA_SUFFIX)
    }

    /// Short help without the ` (extra)` marker.
    pub fn short_help(&self) -> &'static str {
        self.short.strip_suffix(EXTRA_SUFFIX).unwrap_or(self.short)
    }

    /// Usage line with `[-a <app>]` inserted after the name when an app is needed.
    pub fn full_usage(&self) -> String {
        if self.needs_app {
            let name = self.name();
            format!("{name} [-a <app>]{}", &self.usage[name.len()..])
        } else {
            self.usage.to_string()
        }
    }

    /// Usage line followed by the long help.
    pub fn usage_text(&self) -> String {
        let long = self.long.trim_matches('\n');
        if self.is_runnable() {
            format!("Usage: hk {}\n\n{}\n", self.full_usage(), long)
        } else {
            format!("{long}\n")
        }
    }

    /// Argument parser for one invocation of this command.
    ///
    /// Parsing stops at the first positional argument: everything after it,
    /// flags included, is collected under [`ARGS`].
    pub fn clap_command(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .args((self.flags)());

        if self.needs_app {
            cmd = cmd.arg(
                Arg::new(APP_FLAG)
                    .short('a')
                    .value_name("app")
                    .action(ArgAction::Set),
            );
        }

        cmd.arg(
            Arg::new(ARGS)
                .num_args(0..)
                .action(ArgAction::Append)
                .trailing_var_arg(true)
                .value_name("ARGS"),
        )
    }
}

/// Outcome of a handler that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,

    /// Print the command's usage text before exiting.
    pub show_usage: bool,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            show_usage: false,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            exit_code,
            show_usage: false,
        }
    }

    /// Wrong arguments: print usage and exit 2.
    pub fn usage() -> Self {
        Self {
            exit_code: crate::error::EXIT_USAGE,
            show_usage: true,
        }
    }
}

/// A parsed invocation of a built-in command.
pub struct Invocation<'a> {
    pub spec: &'a CommandSpec,
    pub registry: &'a Registry,
    pub matches: ArgMatches,
    /// Resolved app, present iff the command needs one.
    pub app: Option<String>,
}

impl<'a> Invocation<'a> {
    /// Positional arguments in order.
    pub fn args(&self) -> Vec<&str> {
        self.matches
            .get_many::<String>(ARGS)
            .map(|values| values.map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The resolved app.
    pub fn app(&self) -> Result<&str> {
        self.app.as_deref().ok_or(HkError::NoApp)
    }

    /// String value of a command flag.
    pub fn flag(&self, id: &str) -> Option<&str> {
        self.matches.get_one::<String>(id).map(String::as_str)
    }
}

/// Ordered set of commands and help topics with unique names.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<CommandSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command and help topic.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in super::commands::builtin() {
            registry.register(spec);
        }
        registry
    }

    /// Add a command.
    ///
    /// # Panics
    ///
    /// Panics if a command with the same name is already registered.
    pub fn register(&mut self, spec: CommandSpec) {
        assert!(
            self.find(spec.name()).is_none(),
            "duplicate command name: {}",
            spec.name()
        );
        self.commands.push(spec);
    }

    /// All entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    /// Entry named `name`, command or topic.
    pub fn find(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// Command named `name` that has a handler.
    pub fn find_runnable(&self, name: &str) -> Option<&CommandSpec> {
        self.find(name).filter(|c| c.is_runnable())
    }

    /// Names of all runnable commands.
    pub fn runnable_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands
            .iter()
            .filter(|c| c.is_runnable())
            .map(CommandSpec::name)
    }
}
