//! Working-app resolution.

use crate::config::APP_ENV;
use crate::error::{HkError, Result};
use crate::git::{GitHost, RemoteInspector, RemoteLookupError, RemoteSource};

/// Where a resolved app name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppSource {
    /// `-a` named a git remote pointing at the app.
    FlagRemote,
    /// `-a` named the app directly.
    Flag,
    /// The `HKAPP` environment variable.
    Environment,
    /// The remote pinned by `heroku.remote`.
    PreferredRemote,
    /// The only app any remote points at.
    Remotes,
}

/// Derives the working app from the flag, the environment and git remotes.
///
/// Nothing is cached: every call re-reads the remotes.
pub struct AppResolver<'a> {
    inspector: RemoteInspector<'a>,
}

impl<'a> AppResolver<'a> {
    pub fn new(source: &'a dyn RemoteSource, host: &'a GitHost) -> Self {
        Self {
            inspector: RemoteInspector::new(source, host),
        }
    }

    /// Resolve the app name.
    ///
    /// Order: explicit flag (remote name first, else literal), `HKAPP`,
    /// the preferred remote, then the single app named by all remotes.
    pub fn resolve<F>(&self, explicit: Option<&str>, env: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (app, source) = self.resolve_with_source(explicit, env)?;
        tracing::debug!("Resolved app {app} from {source:?}");
        Ok(app)
    }

    /// Like [`resolve`](Self::resolve) but also reports the source.
    pub fn resolve_with_source<F>(&self, explicit: Option<&str>, env: F) -> Result<(String, AppSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = explicit.filter(|f| !f.is_empty()) {
            return Ok(match self.inspector.app_from_remote(flag) {
                Ok(app) => (app, AppSource::FlagRemote),
                Err(_) => (flag.to_string(), AppSource::Flag),
            });
        }

        if let Some(app) = env(APP_ENV).filter(|v| !v.is_empty()) {
            return Ok((app, AppSource::Environment));
        }

        if let Some(app) = self.inspector.app_from_preferred_remote() {
            return Ok((app, AppSource::PreferredRemote));
        }

        match self.inspector.app_from_any_remote() {
            Ok(app) => Ok((app, AppSource::Remotes)),
            Err(RemoteLookupError::Ambiguous { candidates }) => {
                Err(HkError::AmbiguousApp { candidates })
            }
            Err(_) => Err(HkError::NoApp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::StaticRemotes;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn hkapp(value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |key| (key == "HKAPP").then(|| value.to_string())
    }

    fn resolve(remotes: &StaticRemotes, explicit: Option<&str>) -> Result<(String, AppSource)> {
        let host = GitHost::new("heroku.com");
        AppResolver::new(remotes, &host).resolve_with_source(explicit, no_env)
    }

    #[test]
    fn flag_naming_a_remote_is_translated() {
        let remotes = StaticRemotes::new().with_remote("staging", "https://git.heroku.com/foo-staging.git");
        assert_eq!(
            resolve(&remotes, Some("staging")).unwrap(),
            ("foo-staging".to_string(), AppSource::FlagRemote)
        );
    }

    #[test]
    fn flag_is_literal_when_not_a_remote() {
        let remotes = StaticRemotes::new().with_remote("heroku", "https://git.heroku.com/other.git");
        assert_eq!(
            resolve(&remotes, Some("literal-app")).unwrap(),
            ("literal-app".to_string(), AppSource::Flag)
        );
    }

    #[test]
    fn flag_naming_non_platform_remote_is_literal() {
        let remotes = StaticRemotes::new().with_remote("origin", "git@github.com:me/code.git");
        assert_eq!(resolve(&remotes, Some("origin")).unwrap().0, "origin");
    }

    #[test]
    fn flag_beats_environment() {
        let remotes = StaticRemotes::new();
        let host = GitHost::new("heroku.com");
        let app = AppResolver::new(&remotes, &host)
            .resolve(Some("flagged"), hkapp("from-env"))
            .unwrap();
        assert_eq!(app, "flagged");
    }

    #[test]
    fn environment_beats_remotes() {
        let remotes = StaticRemotes::new().with_remote("heroku", "https://git.heroku.com/remote-app.git");
        let host = GitHost::new("heroku.com");
        let resolved = AppResolver::new(&remotes, &host)
            .resolve_with_source(None, hkapp("env-app"))
            .unwrap();
        assert_eq!(resolved, ("env-app".to_string(), AppSource::Environment));
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let remotes = StaticRemotes::new().with_remote("heroku", "https://git.heroku.com/remote-app.git");
        let host = GitHost::new("heroku.com");
        let app = AppResolver::new(&remotes, &host)
            .resolve(None, hkapp(""))
            .unwrap();
        assert_eq!(app, "remote-app");
    }

    #[test]
    fn single_remote_app() {
        let remotes = StaticRemotes::new()
            .with_remote("origin", "git@github.com:me/code.git")
            .with_remote("heroku", "git@heroku.com:foo.git");
        assert_eq!(
            resolve(&remotes, None).unwrap(),
            ("foo".to_string(), AppSource::Remotes)
        );
    }

    #[test]
    fn two_remotes_same_app_is_not_ambiguous() {
        let remotes = StaticRemotes::new()
            .with_remote("heroku", "git@heroku.com:foo.git")
            .with_remote("mirror", "https://git.heroku.com/foo.git");
        assert_eq!(resolve(&remotes, None).unwrap().0, "foo");
    }

    #[test]
    fn preferred_remote_breaks_ambiguity() {
        let remotes = StaticRemotes::new()
            .with_remote("heroku", "https://git.heroku.com/foo.git")
            .with_remote("staging", "https://git.heroku.com/foo-staging.git")
            .with_preferred("staging");
        assert_eq!(
            resolve(&remotes, None).unwrap(),
            ("foo-staging".to_string(), AppSource::PreferredRemote)
        );
    }

    #[test]
    fn ambiguous_remotes_list_candidates() {
        let remotes = StaticRemotes::new()
            .with_remote("staging", "https://git.heroku.com/foo-staging.git")
            .with_remote("heroku", "https://git.heroku.com/foo.git");
        let err = resolve(&remotes, None).unwrap_err();
        match err {
            HkError::AmbiguousApp { candidates } => {
                assert_eq!(candidates, vec!["foo", "foo-staging"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nothing_to_go_on_is_no_app() {
        let remotes = StaticRemotes::new().with_remote("origin", "git@github.com:me/code.git");
        let err = resolve(&remotes, None).unwrap_err();
        assert!(matches!(err, HkError::NoApp));
        assert!(err.is_usage());
    }
}
