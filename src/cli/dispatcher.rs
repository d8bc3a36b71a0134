//! Command dispatching.
//!
//! Routing for one invocation:
//! 1. a missing command or a leading `-` prints the top-level usage (exit 2)
//! 2. a runnable built-in with that name parses its flags, resolves the app
//!    when needed and runs
//! 3. otherwise an `hk-<name>` plugin is executed
//! 4. otherwise the command is unknown (exit 2, with suggestions)

use std::ffi::OsString;

use crate::context::Context;
use crate::error::{HkError, EXIT_USAGE};
use crate::plugin::{exec_plugin, plugin_env, ExecStrategy, PluginResolver};
use crate::ui::UserInterface;

use super::registry::{CommandSpec, Handler, Invocation, Registry, APP_FLAG};
use super::{suggest, usage};

/// The command word of `argv`, if it names a command at all.
///
/// A command word that is not valid UTF-8 names nothing.
pub fn command_name(argv: &[OsString]) -> Option<&str> {
    argv.first()
        .and_then(|arg| arg.to_str())
        .filter(|name| !name.starts_with('-'))
}

/// Routes argv to a built-in command or plugin.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    plugins: PluginResolver,
    strategy: ExecStrategy,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, plugins: PluginResolver) -> Self {
        Self {
            registry,
            plugins,
            strategy: ExecStrategy::default(),
        }
    }

    /// Choose how plugins are started.
    pub fn with_strategy(mut self, strategy: ExecStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Dispatch `argv` (without the program name) and return the exit code.
    ///
    /// Built-in commands see their arguments through clap, which rejects
    /// non-UTF-8 values; plugins receive `argv` as given.
    pub fn dispatch(
        &self,
        argv: &[OsString],
        ctx: &mut Context,
        ui: &mut dyn UserInterface,
    ) -> i32 {
        tracing::debug!("Dispatching {:?}", argv);

        let Some(name) = command_name(argv) else {
            ui.usage(&usage::top_level(self.registry));
            return EXIT_USAGE;
        };

        let builtin = self
            .registry
            .find_runnable(name)
            .and_then(|spec| spec.run.map(|run| (spec, run)));

        match builtin {
            Some((spec, run)) => self.run_builtin(spec, run, argv, ctx, ui),
            None => self.run_plugin(name, argv, ctx, ui),
        }
    }

    fn run_builtin(
        &self,
        spec: &CommandSpec,
        run: Handler,
        argv: &[OsString],
        ctx: &mut Context,
        ui: &mut dyn UserInterface,
    ) -> i32 {
        tracing::debug!("Running built-in command {}", spec.name());

        let matches = match spec.clap_command().try_get_matches_from(&argv[1..]) {
            Ok(matches) => matches,
            Err(e) => {
                ui.error(&clap_error_message(&e));
                ui.usage(&spec.usage_text());
                return EXIT_USAGE;
            }
        };

        let app = if spec.needs_app {
            let flag = matches.get_one::<String>(APP_FLAG).map(String::as_str);
            match ctx.resolve_app(flag) {
                Ok(app) => Some(app),
                Err(e) => return self.report(spec, &e, ui),
            }
        } else {
            None
        };

        let invocation = Invocation {
            spec,
            registry: self.registry,
            matches,
            app,
        };

        match run(&invocation, ctx, ui) {
            Ok(result) => {
                if result.show_usage {
                    ui.usage(&spec.usage_text());
                }
                result.exit_code
            }
            Err(e) => self.report(spec, &e, ui),
        }
    }

    fn report(&self, spec: &CommandSpec, err: &HkError, ui: &mut dyn UserInterface) -> i32 {
        ui.error(&err.to_string());
        if err.is_usage() {
            ui.usage(&spec.usage_text());
        }
        err.exit_code()
    }

    fn run_plugin(
        &self,
        name: &str,
        argv: &[OsString],
        ctx: &mut Context,
        ui: &mut dyn UserInterface,
    ) -> i32 {
        let Some(path) = self.plugins.find_plugin(name) else {
            return self.unknown_command(name, ui);
        };

        let env = plugin_env(ctx);
        match exec_plugin(&path, argv, &env, self.strategy) {
            Ok(code) => code,
            Err(e) => {
                ui.error(&e.to_string());
                e.exit_code()
            }
        }
    }

    fn unknown_command(&self, name: &str, ui: &mut dyn UserInterface) -> i32 {
        let err = HkError::UnknownCommand {
            name: name.to_string(),
        };
        ui.usage(&err.to_string());

        let alternatives = suggest::suggest(name, self.registry.runnable_names());
        if !alternatives.is_empty() {
            ui.usage(&format!("Possible alternatives: {}", alternatives.join(" ")));
        }
        ui.usage("Run 'hk help' for usage.");
        err.exit_code()
    }
}

/// First line of a clap error without its `error: ` prefix.
fn clap_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
