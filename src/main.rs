//! hk CLI entry point.

use std::ffi::OsString;
use std::process::ExitCode;

use hk::cli::{command_name, usage, Dispatcher, Registry};
use hk::config::DEBUG_ENV;
use hk::context::Context;
use hk::error::EXIT_USAGE;
use hk::plugin::PluginResolver;
use hk::ui::{TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `HKDEBUG` set to a non-empty value sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("hk=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hk=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let debug = std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty());
    init_tracing(debug);

    let argv: Vec<OsString> = std::env::args_os().skip(1).collect();
    tracing::debug!("hk starting with args: {:?}", argv);

    let mut ui = TerminalUI::new();
    let registry = Registry::builtin();

    if command_name(&argv).is_none() {
        ui.usage(&usage::top_level(&registry));
        return exit_code(EXIT_USAGE);
    }

    let mut ctx = match Context::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            ui.error(&e.to_string());
            return exit_code(e.exit_code());
        }
    };

    let plugins = PluginResolver::from_config(ctx.config());
    let code = Dispatcher::new(&registry, plugins).dispatch(&argv, &mut ctx, &mut ui);
    exit_code(code)
}
