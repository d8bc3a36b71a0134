//! `hk which-app`

use crate::cli::registry::{CommandResult, CommandSpec, Invocation};
use crate::context::Context;
use crate::error::Result;
use crate::ui::UserInterface;

pub const WHICH_APP: CommandSpec = CommandSpec {
    usage: "which-app",
    category: "app",
    short: "show which app is selected, if any (extra)",
    long: "
Which-app shows which app hk would use for the current command.

The app comes from, in order: the -a flag (a git remote name or an
app name), the HKAPP environment variable, the git remote named by
`git config heroku.remote`, and finally the single app that the
current repository's git remotes point at.

Examples:

    $ hk which-app
    myapp

    $ hk which-app -a staging
    myapp-staging
",
    needs_app: true,
    flags: Vec::new,
    run: Some(run_which_app),
};

fn run_which_app(
    inv: &Invocation<'_>,
    _ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    if !inv.args().is_empty() {
        return Ok(CommandResult::usage());
    }
    ui.message(inv.app()?);
    Ok(CommandResult::success())
}
