//! Fixtures shared by command tests.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;

use tempfile::TempDir;

use crate::config::{Config, EnvLookup};
use crate::context::Context;
use crate::creds::CredentialStore;
use crate::git::StaticRemotes;
use crate::plugin::{ExecStrategy, PluginResolver};
use crate::ui::MockUI;

use super::dispatcher::Dispatcher;
use super::registry::Registry;

/// Context over a fresh netrc holding `netrc`, with `vars` as the whole
/// environment. The temp dir must outlive the context.
pub(crate) fn context(vars: &[(&str, &str)], netrc: &str, remotes: StaticRemotes) -> (TempDir, Context) {
    let temp = TempDir::new().unwrap();
    let netrc_path = temp.path().join(".netrc");
    fs::write(&netrc_path, netrc).unwrap();

    let mut vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.entry("NETRC_PATH".into())
        .or_insert_with(|| netrc_path.display().to_string());

    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    let creds = CredentialStore::load(&config.netrc_path).unwrap();
    let env: EnvLookup = Box::new(move |key: &str| vars.get(key).cloned());
    (temp, Context::new(config, creds, Box::new(remotes), env))
}

/// Dispatch `argv` against `registry` with no plugin directories.
pub(crate) fn dispatch(registry: &Registry, argv: &[&str], ctx: &mut Context) -> (i32, MockUI) {
    let mut ui = MockUI::new();
    let code = dispatch_with(registry, argv, ctx, &mut ui);
    (code, ui)
}

/// Like [`dispatch`], with a prepared UI (e.g. one holding prompt answers).
pub(crate) fn dispatch_with(
    registry: &Registry,
    argv: &[&str],
    ctx: &mut Context,
    ui: &mut MockUI,
) -> i32 {
    let dispatcher =
        Dispatcher::new(registry, PluginResolver::new(Vec::new())).with_strategy(ExecStrategy::Spawn);
    let argv: Vec<OsString> = argv.iter().map(OsString::from).collect();
    dispatcher.dispatch(&argv, ctx, ui)
}

/// Dispatch `argv` against the built-in commands.
pub(crate) fn run(argv: &[&str], ctx: &mut Context) -> (i32, MockUI) {
    dispatch(&Registry::builtin(), argv, ctx)
}

/// Dispatch `argv` against the built-in commands with a prepared UI.
pub(crate) fn run_with(argv: &[&str], ctx: &mut Context, ui: &mut MockUI) -> i32 {
    dispatch_with(&Registry::builtin(), argv, ctx, ui)
}

/// A netrc holding `login`/`password` for the API host of `server`.
pub(crate) fn netrc_for(server: &httpmock::MockServer) -> String {
    format!("machine {}\n  login me@example.com\n  password tok\n", server.host())
}
