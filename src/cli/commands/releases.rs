//! `hk releases`, `hk release-info` and `hk rollback`.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Duration, Local, SecondsFormat, TimeZone, Utc};
use anyhow::anyhow;
use clap::{value_parser, Arg, ArgAction};

use crate::api::{ApiClient, Release};
use crate::cli::registry::{CommandResult, CommandSpec, Invocation};
use crate::context::Context;
use crate::error::Result;
use crate::ui::{Table, UserInterface};

/// Releases shown by `hk releases` when `-n` is not given.
pub const DEFAULT_RELEASE_COUNT: usize = 30;

pub const RELEASES: CommandSpec = CommandSpec {
    usage: "releases [-n <max>] [<version>...]",
    category: "release",
    short: "list releases",
    long: "
Lists releases. Shows the version of the release (e.g. v1), who
made the release, git commit id, time of the release, and
description.

Options:

    -n <max>  maximum number of recent releases to display (default 30)

Examples:

    $ hk releases
    v1  bob@test.com  3ae20c2  Jun 12 18:28  Deploy 3ae20c2
    v2  john@me.com   0fda0ae  Jun 13 18:14  Deploy 0fda0ae
    v3  john@me.com            Jun 13 18:31  Rollback to v2

    $ hk releases -n 2
    v2  john  0fda0ae  Jun 13 18:14  Deploy 0fda0ae
    v3  john           Jun 13 18:31  Rollback to v2

    $ hk releases 1 3
    v1  bob@test.com  3ae20c2  Jun 12 18:28  Deploy 3ae20c2
    v3  john@me.com            Jun 13 18:31  Rollback to v2
",
    needs_app: true,
    flags: releases_flags,
    run: Some(run_releases),
};

pub const RELEASE_INFO: CommandSpec = CommandSpec {
    usage: "release-info <version>",
    category: "release",
    short: "show release info",
    long: "
Release-info shows detailed information about a release.

Example:

    $ hk release-info v116
    Version:  v116
    By:       user@test.com
    Change:   Deploy 62b3059
    When:     2014-01-13T21:20:57Z
    Id:       abcd1234-5678-def0-8190-12347060474d
    Slug:     98765432-82ba-10ba-fedc-8d206789d062
",
    needs_app: true,
    flags: Vec::new,
    run: Some(run_release_info),
};

pub const ROLLBACK: CommandSpec = CommandSpec {
    usage: "rollback <version>",
    category: "release",
    short: "roll back to a previous release",
    long: "
Rollback re-releases an app at an older version. This action
creates a new release based on the older release, then restarts
the app's dynos on the new release.

Example:

    $ hk rollback v4
    Rolled back myapp to v4 as v7.
",
    needs_app: true,
    flags: Vec::new,
    run: Some(run_rollback),
};

fn releases_flags() -> Vec<Arg> {
    vec![Arg::new("n")
        .short('n')
        .value_name("max")
        .value_parser(value_parser!(usize))
        .action(ArgAction::Set)]
}

fn run_releases(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let app = inv.app()?;
    let client = ctx.api_client()?;

    let args = inv.args();
    let mut releases = if args.is_empty() {
        let max = inv
            .matches
            .get_one::<usize>("n")
            .copied()
            .unwrap_or(DEFAULT_RELEASE_COUNT);
        client.release_list(app, max)?
    } else {
        let versions: Vec<&str> = args
            .into_iter()
            .map(trim_version)
            .filter(|v| !v.is_empty())
            .collect();
        fetch_releases(&client, app, &versions)?
    };
    releases.sort_by_key(|r| r.version);

    let table = release_table(&releases, Utc::now());
    if !table.is_empty() {
        ui.message(&table.render());
    }
    Ok(CommandResult::success())
}

/// Look up each version on its own thread and collect the results.
///
/// Fails with the first error received; lookups still in flight are
/// abandoned. The channel holds one message per version so no sender
/// ever blocks. A worker that exits without sending fails the whole
/// lookup.
fn fetch_releases(client: &ApiClient, app: &str, versions: &[&str]) -> Result<Vec<Release>> {
    let (tx, rx) = mpsc::sync_channel::<Result<Release>>(versions.len());

    for version in versions {
        let tx = tx.clone();
        let client = client.clone();
        let app = app.to_string();
        let version = version.to_string();
        thread::spawn(move || {
            tracing::debug!("Fetching release v{version} of {app}");
            let _ = tx.send(client.release_info(&app, &version));
        });
    }
    drop(tx);

    collect_releases(&rx, app, versions.len())
}

fn collect_releases(
    rx: &mpsc::Receiver<Result<Release>>,
    app: &str,
    expected: usize,
) -> Result<Vec<Release>> {
    let mut releases = Vec::with_capacity(expected);
    while releases.len() < expected {
        let result = rx.recv().map_err(|_| {
            anyhow!(
                "release lookup for {app} stopped after {} of {expected} results",
                releases.len()
            )
        })?;
        releases.push(result?);
    }
    Ok(releases)
}

fn release_table(releases: &[Release], now: DateTime<Utc>) -> Table {
    let who = abbrev_emails(releases.iter().map(|r| r.user.email.as_str()));

    let mut table = Table::new();
    for (release, who) in releases.iter().zip(who) {
        table.add_row([
            format!("v{}", release.version),
            abbrev(&who, 10),
            abbrev(deployed_commit(&release.description), 10),
            pretty_time(&release.created_at.with_timezone(&Local), now),
            release.description.clone(),
        ]);
    }
    table
}

fn run_release_info(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let app = inv.app()?;
    let args = inv.args();
    let [version] = args[..] else {
        return Ok(CommandResult::usage());
    };

    let release = ctx.api_client()?.release_info(app, trim_version(version))?;

    let mut table = Table::new();
    table.add_row(["Version:".to_string(), format!("v{}", release.version)]);
    table.add_row(["By:".to_string(), release.user.email.clone()]);
    table.add_row(["Change:".to_string(), release.description.clone()]);
    table.add_row([
        "When:".to_string(),
        release.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    ]);
    table.add_row(["Id:".to_string(), release.id.clone()]);
    table.add_row([
        "Slug:".to_string(),
        release.slug.map(|s| s.id).unwrap_or_default(),
    ]);
    ui.message(&table.render());
    Ok(CommandResult::success())
}

fn run_rollback(
    inv: &Invocation<'_>,
    ctx: &mut Context,
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let app = inv.app()?;
    let args = inv.args();
    let [version] = args[..] else {
        return Ok(CommandResult::usage());
    };

    let version = trim_version(version);
    let release = ctx.api_client()?.release_rollback(app, version)?;
    ui.success(&format!(
        "Rolled back {app} to v{version} as v{}.",
        release.version
    ));
    Ok(CommandResult::success())
}

fn trim_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Shorten `s` to at most `n` characters, marking the cut with `…`.
fn abbrev(s: &str, n: usize) -> String {
    if s.chars().count() <= n {
        return s.to_string();
    }
    let mut out: String = s.chars().take(n.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Drop the most common `@domain` from each address.
///
/// Ties go to the alphabetically first domain.
fn abbrev_emails<'a>(emails: impl Iterator<Item = &'a str> + Clone) -> Vec<String> {
    let mut domains: HashMap<&str, usize> = HashMap::new();
    for email in emails.clone() {
        if let Some(at) = email.find('@') {
            *domains.entry(&email[at..]).or_default() += 1;
        }
    }

    let common = domains
        .into_iter()
        .max_by(|(a, n), (b, m)| n.cmp(m).then_with(|| b.cmp(a)))
        .map(|(domain, _)| domain);

    emails
        .map(|email| match common {
            Some(domain) => email.strip_suffix(domain).unwrap_or(email).to_string(),
            None => email.to_string(),
        })
        .collect()
}

/// Commit id from a `Deploy <sha>` description.
fn deployed_commit(description: &str) -> &str {
    description
        .strip_prefix("Deploy ")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default()
}

/// `Jan _2 15:04` within roughly six months of `now`, `Jan _2  2006` otherwise.
fn pretty_time<Tz: TimeZone>(t: &DateTime<Tz>, now: DateTime<Utc>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let age = now.signed_duration_since(t.with_timezone(&Utc));
    if age < Duration::days(182) && age > -Duration::days(182) {
        t.format("%b %e %H:%M").to_string()
    } else {
        t.format("%b %e  %Y").to_string()
    }
}
