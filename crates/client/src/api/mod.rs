//! Typed REST clients for the TaskMart backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth - NO local sync, direct API calls
//! - One client per resource ([`AuthApi`], [`TaskApi`], [`ProductApi`],
//!   [`CartApi`]), all sharing a single [`ApiClient`]
//! - The shared client holds the bearer token; the session store installs it
//!   on login and clears it on logout
//!
//! # Example
//!
//! ```rust,ignore
//! use taskmart_client::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(&ClientConfig::from_env()?)?;
//! let tasks = client.tasks().list().await?;
//! ```

mod auth;
mod cart;
mod products;
mod tasks;

pub use auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
pub use cart::CartApi;
pub use products::{ImageUpload, ProductApi};
pub use tasks::TaskApi;

use std::sync::{Arc, RwLock};

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Shared HTTP client for the TaskMart backend.
///
/// Cheap to clone; all clones share the same connection pool and bearer
/// token slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                token: RwLock::new(None),
            }),
        })
    }

    /// Auth client sharing this connection pool.
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Task client sharing this connection pool.
    #[must_use]
    pub fn tasks(&self) -> TaskApi {
        TaskApi::new(self.clone())
    }

    /// Product client sharing this connection pool.
    #[must_use]
    pub fn products(&self) -> ProductApi {
        ProductApi::new(self.clone())
    }

    /// Cart client sharing this connection pool.
    #[must_use]
    pub fn cart(&self) -> CartApi {
        CartApi::new(self.clone())
    }

    /// Install the bearer token used for authenticated requests.
    pub fn set_token(&self, token: SecretString) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = Some(token);
        }
    }

    /// Remove the bearer token.
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = None;
        }
    }

    /// Whether a bearer token is currently installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Start a request to `path` (e.g. `/api/tasks`), attaching the bearer
    /// token when one is installed.
    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.http.request(method, url);

        let token = self
            .inner
            .token
            .read()
            .ok()
            .and_then(|slot| slot.clone());
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Start a request that never carries credentials (register/login).
    pub(crate) fn request_unauthenticated(
        &self,
        method: Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        self.inner.http.request(method, url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Map a non-2xx response to [`ApiError::Api`], pulling the server-provided
/// `message` field when the error body is JSON.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error_from_body(status.as_u16(), &body))
}

/// Decode a successful JSON response, mapping non-2xx to [`ApiError::Api`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

fn api_error_from_body(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.chars().take(200).collect()
            }
        });

    ApiError::Api { status, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_server_message() {
        let err = api_error_from_body(422, r#"{"message": "The title field is required."}"#);
        assert_eq!(
            err.to_string(),
            "API error: 422 - The title field is required."
        );
    }

    #[test]
    fn test_api_error_falls_back_to_body_text() {
        let err = api_error_from_body(500, "Server exploded");
        assert_eq!(err.to_string(), "API error: 500 - Server exploded");
    }

    #[test]
    fn test_api_error_empty_body() {
        let err = api_error_from_body(401, "");
        assert_eq!(err.to_string(), "API error: 401 - HTTP 401");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = crate::config::ClientConfig::new("http://localhost:8000", "/tmp");
        let client = ApiClient::new(&config).unwrap();
        client.set_token(SecretString::from("super-secret-token"));

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
    }

    #[test]
    fn test_token_lifecycle() {
        let config = crate::config::ClientConfig::new("http://localhost:8000", "/tmp");
        let client = ApiClient::new(&config).unwrap();
        assert!(!client.has_token());

        client.set_token(SecretString::from("t"));
        assert!(client.has_token());

        client.clear_token();
        assert!(!client.has_token());
    }
}
