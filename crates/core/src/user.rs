//! User identity types.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// The user a session belongs to.
///
/// Users created through register/login carry the backend's id; users
/// arriving via an OAuth redirect carry only what the redirect query string
/// provided (no backend id, possibly no email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl User {
    /// Display name used when an OAuth redirect omits one.
    pub const OAUTH_FALLBACK_NAME: &'static str = "OAuth User";

    /// Build a user from OAuth redirect parameters.
    #[must_use]
    pub fn from_oauth(name: Option<String>, email: Option<Email>) -> Self {
        Self {
            id: None,
            name: name.unwrap_or_else(|| Self::OAUTH_FALLBACK_NAME.to_string()),
            email,
        }
    }
}
