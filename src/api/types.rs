//! Platform API resource types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An app.
#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub git_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub region: Option<NamedRef>,
    #[serde(default)]
    pub stack: Option<NamedRef>,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Reference to a resource by name.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// Reference to a resource by id.
#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: String,
}

/// Account that performed an action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
}

/// A release of an app.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: String,
    pub version: u64,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub slug: Option<IdRef>,
}

/// Body of `POST /apps`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppCreateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Error document returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub id: Option<String>,
    pub message: String,
}
