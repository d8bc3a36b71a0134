//! `hk version`

use crate::api::user_agent;
use crate::cli::registry::{CommandResult, CommandSpec, Invocation};
use crate::context::Context;
use crate::error::Result;
use crate::ui::UserInterface;

pub const VERSION: CommandSpec = CommandSpec {
    usage: "version",
    category: "hk",
    short: "show hk version",
    long: "
Version shows the hk client version string.

Example:

    $ hk version
    hk/0.1.0 (linux; x86_64)
",
    needs_app: false,
    flags: Vec::new,
    run: Some(run_version),
};

fn run_version(
    inv: &Invocation<'_>,
    _ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    if !inv.args().is_empty() {
        return Ok(CommandResult::usage());
    }
    ui.message(&user_agent());
    Ok(CommandResult::success())
}
