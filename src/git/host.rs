//! Recognition of platform git URLs.

use regex::Regex;
use reqwest::Url;

/// The platform's git domain and the URL shapes that point at it.
#[derive(Debug, Clone)]
pub struct GitHost {
    domain: String,
    scp: Regex,
    app_name: Regex,
}

impl GitHost {
    /// Create a matcher for `domain` (e.g. `heroku.com`).
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            // user@host:path, the scp-like form git accepts for ssh
            scp: Regex::new(r"^(?:[^@/:]+@)?([^@/:]+):/?(.+)$").expect("valid regex"),
            app_name: Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").expect("valid regex"),
        }
    }

    /// HTTPS git URL for an app.
    pub fn app_url(&self, app: &str) -> String {
        format!("https://git.{}/{}.git", self.domain, app)
    }

    /// App name encoded in a remote URL, if the URL points at this host.
    pub fn app_from_url(&self, url: &str) -> Option<String> {
        let (host, path) = if url.contains("://") {
            let parsed = Url::parse(url).ok()?;
            (parsed.host_str()?.to_string(), parsed.path().to_string())
        } else {
            let caps = self.scp.captures(url)?;
            (caps[1].to_string(), caps[2].to_string())
        };

        if !self.is_platform_host(&host) {
            return None;
        }

        let path = path.trim_start_matches('/');
        let name = path.strip_suffix(".git").unwrap_or(path);
        self.app_name.is_match(name).then(|| name.to_string())
    }

    fn is_platform_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        host == self.domain || host.strip_prefix("git.") == Some(self.domain.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> GitHost {
        GitHost::new("heroku.com")
    }

    #[test]
    fn https_git_subdomain() {
        assert_eq!(
            host().app_from_url("https://git.heroku.com/myapp.git").as_deref(),
            Some("myapp")
        );
    }

    #[test]
    fn https_without_git_suffix() {
        assert_eq!(
            host().app_from_url("https://git.heroku.com/myapp").as_deref(),
            Some("myapp")
        );
    }

    #[test]
    fn scp_style_ssh() {
        assert_eq!(
            host().app_from_url("git@heroku.com:my-app.git").as_deref(),
            Some("my-app")
        );
    }

    #[test]
    fn ssh_scheme() {
        assert_eq!(
            host().app_from_url("ssh://git@heroku.com/myapp.git").as_deref(),
            Some("myapp")
        );
    }

    #[test]
    fn rejects_other_hosts() {
        assert_eq!(host().app_from_url("git@github.com:me/myapp.git"), None);
        assert_eq!(host().app_from_url("https://github.com/myapp.git"), None);
        assert_eq!(host().app_from_url("https://notheroku.com/myapp.git"), None);
        assert_eq!(host().app_from_url("https://git.heroku.com.evil.io/myapp.git"), None);
    }

    #[test]
    fn rejects_nested_paths_and_empty_names() {
        assert_eq!(host().app_from_url("https://git.heroku.com/org/myapp.git"), None);
        assert_eq!(host().app_from_url("https://git.heroku.com/.git"), None);
        assert_eq!(host().app_from_url("git@heroku.com:"), None);
    }

    #[test]
    fn rejects_local_paths() {
        assert_eq!(host().app_from_url("/srv/git/myapp.git"), None);
        assert_eq!(host().app_from_url("../myapp"), None);
    }

    #[test]
    fn custom_domain() {
        let host = GitHost::new("example.dev");
        assert_eq!(
            host.app_from_url("https://git.example.dev/app.git").as_deref(),
            Some("app")
        );
        assert_eq!(host.app_from_url("https://git.heroku.com/app.git"), None);
    }

    #[test]
    fn app_url_round_trips() {
        let host = host();
        assert_eq!(host.app_url("myapp"), "https://git.heroku.com/myapp.git");
        assert_eq!(host.app_from_url(&host.app_url("myapp")).as_deref(), Some("myapp"));
    }
}
