//! Per-process state shared by every command.
//!
//! A [`Context`] is built once in `main` from the environment and handed to
//! the dispatcher. Tests build one with [`Context::new`] and fakes for the
//! remote source and environment.

mod resolver;

pub use resolver::{AppResolver, AppSource};

use crate::api::ApiClient;
use crate::config::{process_env, Config, EnvLookup};
use crate::creds::{CredentialStore, Credentials};
use crate::error::{HkError, Result};
use crate::git::{GitHost, GitRemotes, RemoteSource};

/// Configuration, credentials and repository access for one invocation.
pub struct Context {
    config: Config,
    creds: CredentialStore,
    remotes: Box<dyn RemoteSource>,
    env: EnvLookup,
    git_host: GitHost,
}

impl Context {
    pub fn new(
        config: Config,
        creds: CredentialStore,
        remotes: Box<dyn RemoteSource>,
        env: EnvLookup,
    ) -> Self {
        let git_host = GitHost::new(config.git_host.clone());
        Self {
            config,
            creds,
            remotes,
            env,
            git_host,
        }
    }

    /// Build the context from the process environment, loading the
    /// credential file. A malformed credential file is an error.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        let creds = CredentialStore::load(&config.netrc_path)?;
        Ok(Self::new(
            config,
            creds,
            Box::new(GitRemotes::new()),
            process_env(),
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn creds(&self) -> &CredentialStore {
        &self.creds
    }

    pub fn creds_mut(&mut self) -> &mut CredentialStore {
        &mut self.creds
    }

    pub fn git_host(&self) -> &GitHost {
        &self.git_host
    }

    pub fn remotes(&self) -> &dyn RemoteSource {
        self.remotes.as_ref()
    }

    /// Look up an environment variable through the injected lookup.
    pub fn env(&self, key: &str) -> Option<String> {
        (self.env)(key)
    }

    /// Resolve the working app for this invocation.
    pub fn resolve_app(&self, explicit: Option<&str>) -> Result<String> {
        self.resolver().resolve(explicit, |key| self.env(key))
    }

    fn resolver(&self) -> AppResolver<'_> {
        AppResolver::new(self.remotes.as_ref(), &self.git_host)
    }

    /// Credentials for the API host: URL user-info, then the credential file.
    pub fn api_credentials(&self) -> Result<Credentials> {
        self.creds
            .credentials_for_url(&self.config.api_url)
            .ok_or_else(|| HkError::NotLoggedIn {
                host: self.config.api_host().to_string(),
            })
    }

    /// An authenticated API client.
    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(self.config.api_url.clone(), self.api_credentials()?)
    }
}
