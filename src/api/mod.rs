//! Blocking client for the platform API.
//!
//! Only the handful of endpoints the built-in commands need are covered.
//! Every request carries basic auth, the versioned `Accept` header and an
//! `hk/<version>` user agent. Non-2xx responses become [`HkError::Api`] with
//! the server's message.

mod types;

pub use types::{App, AppCreateOpts, IdRef, NamedRef, Release, User};

use std::time::Duration;

use anyhow::anyhow;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, RANGE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::creds::Credentials;
use crate::error::{HkError, Result};

use types::ErrorBody;

/// Media type selecting API version 3.
pub const ACCEPT_V3: &str = "application/vnd.heroku+json; version=3";

/// User agent sent with every request.
pub fn user_agent() -> String {
    format!(
        "hk/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Authenticated API client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    creds: Credentials,
}

impl ApiClient {
    /// Create a client for `base`. User-info in `base` is stripped; `creds`
    /// is used for authentication instead.
    pub fn new(mut base: Url, creds: Credentials) -> Result<Self> {
        let _ = base.set_username("");
        let _ = base.set_password(None);

        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base,
            creds,
        })
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /apps`
    pub fn app_list(&self) -> Result<Vec<App>> {
        self.send(self.request(Method::GET, &["apps"])?)
    }

    /// `GET /apps/{app}`
    pub fn app_info(&self, app: &str) -> Result<App> {
        self.send(self.request(Method::GET, &["apps", app])?)
    }

    /// `POST /apps`
    pub fn app_create(&self, opts: &AppCreateOpts) -> Result<App> {
        self.send(self.request(Method::POST, &["apps"])?.json(opts))
    }

    /// `GET /apps/{app}/releases`, newest `max` releases.
    pub fn release_list(&self, app: &str, max: usize) -> Result<Vec<Release>> {
        let range = format!("version ..; order=desc, max={max}");
        self.send(
            self.request(Method::GET, &["apps", app, "releases"])?
                .header(RANGE, range),
        )
    }

    /// `GET /apps/{app}/releases/{version}`
    pub fn release_info(&self, app: &str, version: &str) -> Result<Release> {
        self.send(self.request(Method::GET, &["apps", app, "releases", version])?)
    }

    /// `POST /apps/{app}/releases` re-releasing `version`.
    pub fn release_rollback(&self, app: &str, version: &str) -> Result<Release> {
        let body = serde_json::json!({ "release": version });
        self.send(
            self.request(Method::POST, &["apps", app, "releases"])?
                .json(&body),
        )
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API URL cannot be a base: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        tracing::debug!("{method} {url}");
        Ok(self
            .client
            .request(method, url)
            .header(ACCEPT, ACCEPT_V3)
            .basic_auth(&self.creds.login, Some(&self.creds.password)))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json()?);
        }

        let body = response.text().unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => {
                tracing::debug!("API error id: {:?}", err.id);
                err.message
            }
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };

        Err(HkError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
