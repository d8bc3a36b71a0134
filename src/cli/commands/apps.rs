//! `hk create`, `hk apps` and `hk info`.

use clap::{Arg, ArgAction};

use crate::api::{App, AppCreateOpts};
use crate::cli::registry::{CommandResult, CommandSpec, Invocation};
use crate::context::Context;
use crate::error::Result;
use crate::ui::{Table, UserInterface};

/// Remote added to the working repository by `hk create`.
pub const CREATE_REMOTE: &str = "heroku";

pub const CREATE: CommandSpec = CommandSpec {
    usage: "create [-r <region>] [<name>]",
    category: "app",
    short: "create an app",
    long: "
Create creates a new app. Without a name one is generated. When run
inside a git repository, a remote named heroku pointing at the new
app is added.

Options:

    -r <region>  region to create the app in

Examples:

    $ hk create
    Created dodging-samurai-42.

    $ hk create -r eu myapp
    Created myapp.
",
    needs_app: false,
    flags: create_flags,
    run: Some(run_create),
};

pub const APPS: CommandSpec = CommandSpec {
    usage: "apps",
    category: "app",
    short: "list apps",
    long: "
Lists apps you have access to, with their owner and region.

Example:

    $ hk apps
    myapp    me@example.com    us
    myapp-2  you@example.com   eu
",
    needs_app: false,
    flags: Vec::new,
    run: Some(run_apps),
};

pub const INFO: CommandSpec = CommandSpec {
    usage: "info",
    category: "app",
    short: "show app info",
    long: "
Info shows general information about the current app.

Example:

    $ hk info
    Name:     myapp
    Owner:    me@example.com
    Region:   us
    Stack:    cedar
    Git URL:  https://git.heroku.com/myapp.git
    Web URL:  https://myapp.herokuapp.com/
",
    needs_app: true,
    flags: Vec::new,
    run: Some(run_info),
};

fn create_flags() -> Vec<Arg> {
    vec![Arg::new("region")
        .short('r')
        .value_name("region")
        .action(ArgAction::Set)]
}

fn run_create(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let name = match inv.args().as_slice() {
        [] => None,
        [name] => Some(name.to_string()),
        _ => return Ok(CommandResult::usage()),
    };
    let opts = AppCreateOpts {
        name,
        region: inv.flag("region").map(str::to_string),
    };

    let app = ctx.api_client()?.app_create(&opts)?;

    let git_url = app
        .git_url
        .clone()
        .unwrap_or_else(|| ctx.git_host().app_url(&app.name));
    if let Err(e) = ctx.remotes().add_remote(CREATE_REMOTE, &git_url) {
        tracing::debug!("Not adding remote {CREATE_REMOTE}: {e}");
    }

    ui.success(&format!("Created {}.", app.name));
    Ok(CommandResult::success())
}

fn run_apps(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    if !inv.args().is_empty() {
        return Ok(CommandResult::usage());
    }

    let mut apps = ctx.api_client()?.app_list()?;
    apps.sort_by(|a, b| a.name.cmp(&b.name));

    let mut table = Table::new();
    for app in &apps {
        table.add_row([app.name.clone(), owner(app), region(app)]);
    }
    if !table.is_empty() {
        ui.message(&table.render());
    }
    Ok(CommandResult::success())
}

fn run_info(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    if !inv.args().is_empty() {
        return Ok(CommandResult::usage());
    }

    let app = ctx.api_client()?.app_info(inv.app()?)?;

    let mut table = Table::new();
    table.add_row(["Name:".to_string(), app.name.clone()]);
    table.add_row(["Owner:".to_string(), owner(&app)]);
    table.add_row(["Region:".to_string(), region(&app)]);
    table.add_row([
        "Stack:".to_string(),
        app.stack.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
    ]);
    table.add_row(["Git URL:".to_string(), app.git_url.clone().unwrap_or_default()]);
    table.add_row(["Web URL:".to_string(), app.web_url.clone().unwrap_or_default()]);
    if let Some(created) = app.created_at {
        table.add_row(["Created:".to_string(), created.to_rfc3339()]);
    }
    ui.message(&table.render());
    Ok(CommandResult::success())
}

fn owner(app: &App) -> String {
    app.owner.as_ref().map(|o| o.email.clone()).unwrap_or_default()
}

fn region(app: &App) -> String {
    app.region.as_ref().map(|r| r.name.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::testing;
    use crate::git::StaticRemotes;
    use httpmock::prelude::*;

    fn api_context(server: &MockServer, remotes: StaticRemotes) -> (tempfile::TempDir, Context) {
        let url = server.base_url();
        let vars = [("HEROKU_API_URL", url.as_str())];
        testing::context(&vars, &testing::netrc_for(server), remotes)
    }

    #[test]
    fn create_posts_region_and_name_and_adds_remote() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/apps")
                .json_body(serde_json::json!({"name": "myapp", "region": "eu"}));
            then.status(201)
                .body(r#"{"id":"1","name":"myapp","git_url":"https://git.heroku.com/myapp.git"}"#);
        });

        let (_temp, mut ctx) = api_context(&server, StaticRemotes::new());
        let (code, ui) = testing::run(&["create", "-r", "eu", "myapp"], &mut ctx);
        mock.assert();
        assert_eq!(code, 0);
        assert!(ui.has_success("Created myapp."));
        assert_eq!(
            ctx.remotes().remotes()[CREATE_REMOTE],
            "https://git.heroku.com/myapp.git"
        );
    }

    #[test]
    fn create_without_name_sends_empty_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/apps").json_body(serde_json::json!({}));
            then.status(201).body(r#"{"id":"1","name":"dodging-samurai-42"}"#);
        });

        let (_temp, mut ctx) = api_context(&server, StaticRemotes::new());
        let (code, ui) = testing::run(&["create"], &mut ctx);
        assert_eq!(code, 0);
        assert!(ui.has_success("Created dodging-samurai-42."));
        assert_eq!(
            ctx.remotes().remotes()[CREATE_REMOTE],
            "https://git.heroku.com/dodging-samurai-42.git"
        );
    }

    #[test]
    fn create_ignores_existing_remote() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/apps");
            then.status(201).body(r#"{"id":"1","name":"myapp"}"#);
        });

        let remotes = StaticRemotes::new().with_remote("heroku", "https://git.heroku.com/old.git");
        let (_temp, mut ctx) = api_context(&server, remotes);
        let (code, ui) = testing::run(&["create", "myapp"], &mut ctx);
        assert_eq!(code, 0);
        assert!(ui.has_success("Created myapp."));
        assert_eq!(ctx.remotes().remotes()["heroku"], "https://git.heroku.com/old.git");
    }

    #[test]
    fn create_reports_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/apps");
            then.status(422)
                .body(r#"{"id":"invalid_params","message":"Name is already taken"}"#);
        });

        let (_temp, mut ctx) = api_context(&server, StaticRemotes::new());
        let (code, ui) = testing::run(&["create", "myapp"], &mut ctx);
        assert_eq!(code, 1);
        assert!(ui.has_error("Name is already taken (HTTP 422)"));
        assert!(ctx.remotes().remotes().is_empty());
    }

    #[test]
    fn create_requires_login() {
        let (_temp, mut ctx) = testing::context(&[], "", StaticRemotes::new());
        let (code, ui) = testing::run(&["create"], &mut ctx);
        assert_eq!(code, 1);
        assert!(ui.has_error("not logged in"));
    }

    #[test]
    fn apps_lists_sorted_rows() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/apps");
            then.status(200).body(
                r#"[
                    {"id":"2","name":"zeta","owner":{"email":"you@example.com"},"region":{"name":"eu"}},
                    {"id":"1","name":"alpha","owner":{"email":"me@example.com"},"region":{"name":"us"}}
                ]"#,
            );
        });

        let (_temp, mut ctx) = api_context(&server, StaticRemotes::new());
        let (code, ui) = testing::run(&["apps"], &mut ctx);
        assert_eq!(code, 0);
        assert_eq!(
            ui.stdout(),
            "alpha  me@example.com   us\nzeta   you@example.com  eu"
        );
    }

    #[test]
    fn info_shows_resolved_app() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/apps/myapp");
            then.status(200).body(
                r#"{"id":"1","name":"myapp","owner":{"email":"me@example.com"},
                    "region":{"name":"us"},"stack":{"name":"cedar"},
                    "git_url":"https://git.heroku.com/myapp.git",
                    "web_url":"https://myapp.herokuapp.com/"}"#,
            );
        });

        let remotes = StaticRemotes::new().with_remote("heroku", "https://git.heroku.com/myapp.git");
        let (_temp, mut ctx) = api_context(&server, remotes);
        let (code, ui) = testing::run(&["info"], &mut ctx);
        mock.assert();
        assert_eq!(code, 0);
        assert!(ui.has_message("Name:     myapp"));
        assert!(ui.has_message("Stack:    cedar"));
        assert!(ui.has_message("Git URL:  https://git.heroku.com/myapp.git"));
    }
}
