//! `hk login`, `hk logout` and `hk creds`.
//!
//! All three operate on the credential file record for the API host.

use crate::cli::registry::{CommandResult, CommandSpec, Invocation};
use crate::context::Context;
use crate::error::Result;
use crate::ui::{Prompt, UserInterface};

pub const LOGIN: CommandSpec = CommandSpec {
    usage: "login [<email>]",
    category: "hk",
    short: "log in to your account",
    long: "
Login prompts for your email and API token and saves them in the
credential file as the record for the API host.

Example:

    $ hk login
    Email: me@example.com
    API token:
    Logged in.
",
    needs_app: false,
    flags: Vec::new,
    run: Some(run_login),
};

pub const LOGOUT: CommandSpec = CommandSpec {
    usage: "logout",
    category: "hk",
    short: "log out of your account",
    long: "
Logout removes the API host's record from the credential file. Other
records are left untouched.

Example:

    $ hk logout
    Logged out.
",
    needs_app: false,
    flags: Vec::new,
    run: Some(run_logout),
};

pub const CREDS: CommandSpec = CommandSpec {
    usage: "creds",
    category: "hk",
    short: "show credentials (extra)",
    long: "
Creds shows the login and password hk uses for the API host.

Example:

    $ hk creds
    me@example.com 01234567-89ab-cdef-0123-456789abcdef
",
    needs_app: false,
    flags: Vec::new,
    run: Some(run_creds),
};

fn run_login(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let email = match inv.args().as_slice() {
        [] => ui.prompt(&Prompt::input("email", "Email"))?,
        [email] => email.to_string(),
        _ => return Ok(CommandResult::usage()),
    };
    let token = ui.prompt(&Prompt::password("token", "API token"))?;

    let host = ctx.config().api_host().to_string();
    ctx.creds_mut().upsert(&host, email.trim(), token.trim())?;
    ui.success("Logged in.");
    Ok(CommandResult::success())
}

fn run_logout(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    if !inv.args().is_empty() {
        return Ok(CommandResult::usage());
    }

    let host = ctx.config().api_host().to_string();
    ctx.creds_mut().remove(&host)?;
    ui.success("Logged out.");
    Ok(CommandResult::success())
}

fn run_creds(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    if !inv.args().is_empty() {
        return Ok(CommandResult::usage());
    }

    let creds = ctx.api_credentials()?;
    ui.message(&format!("{} {}", creds.login, creds.password));
    Ok(CommandResult::success())
}
