//! Auth API client: register and login.
//!
//! The only two endpoints that do not require a bearer token. Both return
//! the authenticated user together with the token for subsequent calls.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use taskmart_core::User;

use super::{ApiClient, read_json};
use crate::error::ApiError;

/// Registration payload: `POST /api/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Login payload: `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from register/login: the user plus a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Client for the auth endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// registration (e.g. duplicate email, weak password).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .client
            .request_unauthenticated(Method::POST, "/api/register")
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are invalid.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .client
            .request_unauthenticated(Method::POST, "/api/login")
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }
}
