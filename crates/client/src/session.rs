//! Auth session state machine with on-disk persistence.
//!
//! The session moves `Loading -> {Authenticated, Anonymous}` once
//! [`SessionStore::restore`] runs. An OAuth redirect URL carrying a `token`
//! query parameter wins over a stored session; otherwise the session file
//! (the browser localStorage analog) is consulted.
//!
//! There is no token refresh or expiry check: a stale token surfaces later
//! as an ordinary API failure on some authenticated call.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use taskmart_core::{Email, User};

use crate::api::{ApiClient, AuthApi, LoginRequest, RegisterRequest};
use crate::error::ApiError;

/// Session file name under the data directory.
const SESSION_FILE: &str = "session.json";

/// Task snapshot cache, cleared on logout alongside the session.
const TASK_CACHE_FILE: &str = "tasks.json";

/// Errors that can occur when managing the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The session file is not valid JSON.
    #[error("Session parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected a login or registration.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The OAuth redirect URL could not be parsed.
    #[error("Invalid OAuth redirect URL: {0}")]
    InvalidRedirect(String),
}

/// The auth state machine: `Loading -> {Authenticated, Anonymous}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// [`SessionStore::restore`] has not run yet.
    Loading,
    /// A user is signed in.
    Authenticated(User),
    /// No session; the login view should render.
    Anonymous,
}

/// Persisted session payload.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    user: User,
    token: String,
}

/// Owns the current user session and its persistence.
///
/// Installs the bearer token on the shared [`ApiClient`] on login/restore
/// and clears it on logout, so every other client picks up auth changes
/// without being told.
#[derive(Debug)]
pub struct SessionStore {
    api: AuthApi,
    client: ApiClient,
    data_dir: PathBuf,
    state: AuthState,
}

impl SessionStore {
    /// Create a store in the `Loading` state.
    #[must_use]
    pub const fn new(api: AuthApi, client: ApiClient, data_dir: PathBuf) -> Self {
        Self {
            api,
            client,
            data_dir,
            state: AuthState::Loading,
        }
    }

    /// The current auth state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Loading | AuthState::Anonymous => None,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// Where the task store should snapshot its collection.
    #[must_use]
    pub fn task_cache_path(&self) -> PathBuf {
        self.data_dir.join(TASK_CACHE_FILE)
    }

    /// Resolve the initial auth state.
    ///
    /// Checks an OAuth redirect URL first: a `token` query parameter starts
    /// a session for the user described by the `name`/`email` parameters.
    /// Otherwise falls back to the stored session file, then to `Anonymous`.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URL is unparseable or the session
    /// file exists but cannot be read or decoded.
    #[instrument(skip(self, oauth_redirect))]
    pub fn restore(&mut self, oauth_redirect: Option<&str>) -> Result<&AuthState, SessionError> {
        if let Some(redirect) = oauth_redirect
            && let Some(session) = session_from_redirect(redirect)?
        {
            self.install(session)?;
            return Ok(&self.state);
        }

        let path = self.session_path();
        if path.exists() {
            let bytes = std::fs::read(&path)?;
            let session: StoredSession = serde_json::from_slice(&bytes)?;
            self.client
                .set_token(SecretString::from(session.token.clone()));
            self.state = AuthState::Authenticated(session.user);
        } else {
            self.state = AuthState::Anonymous;
        }
        Ok(&self.state)
    }

    /// Log in with email and password, persisting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the session file
    /// cannot be written.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, SessionError> {
        let response = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.install(StoredSession {
            user: response.user.clone(),
            token: response.token,
        })?;
        Ok(response.user)
    }

    /// Register a new account, persisting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration is rejected or the session file
    /// cannot be written.
    #[instrument(skip(self, password), fields(email = %email, name = %name))]
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let response = self
            .api
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                password_confirmation: password.to_string(),
            })
            .await?;
        self.install(StoredSession {
            user: response.user.clone(),
            token: response.token,
        })?;
        Ok(response.user)
    }

    /// End the session: clear the bearer token and delete the session file
    /// plus the cached task snapshot. Purely local; no server call.
    ///
    /// # Errors
    ///
    /// Returns an error if a session artifact exists but cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.client.clear_token();
        self.state = AuthState::Anonymous;
        remove_if_exists(&self.session_path())?;
        remove_if_exists(&self.task_cache_path())?;
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Persist a session, install its token, and enter `Authenticated`.
    fn install(&mut self, session: StoredSession) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(self.session_path(), serde_json::to_vec(&session)?)?;
        self.client.set_token(SecretString::from(session.token));
        self.state = AuthState::Authenticated(session.user);
        Ok(())
    }
}

/// Extract a session from an OAuth redirect URL, if it carries a token.
fn session_from_redirect(redirect: &str) -> Result<Option<StoredSession>, SessionError> {
    let url =
        Url::parse(redirect).map_err(|err| SessionError::InvalidRedirect(err.to_string()))?;

    let mut token = None;
    let mut name = None;
    let mut email = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" => token = Some(value.into_owned()),
            "name" => name = Some(value.into_owned()),
            "email" => email = Email::parse(&value).ok(),
            _ => {}
        }
    }

    Ok(token.map(|token| StoredSession {
        user: User::from_oauth(name, email),
        token,
    }))
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::config::ClientConfig;

    fn store(dir: &Path) -> SessionStore {
        let config = ClientConfig::new("http://127.0.0.1:9", dir);
        let client = ApiClient::new(&config).unwrap();
        SessionStore::new(client.auth(), client, dir.to_path_buf())
    }

    #[test]
    fn test_starts_loading() {
        let dir = tempfile::tempdir().unwrap();
        let session = store(dir.path());
        assert_eq!(*session.state(), AuthState::Loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_without_session_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = store(dir.path());
        assert_eq!(*session.restore(None).unwrap(), AuthState::Anonymous);
    }

    #[test]
    fn test_restore_from_oauth_redirect() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = store(dir.path());

        let state = session
            .restore(Some(
                "http://localhost:5173/?token=abc123&name=Ada&email=ada%40example.com",
            ))
            .unwrap()
            .clone();

        let AuthState::Authenticated(user) = state else {
            panic!("expected authenticated state");
        };
        assert!(user.id.is_none());
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email.unwrap().as_str(), "ada@example.com");
        assert!(dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn test_oauth_redirect_without_token_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = store(dir.path());
        let state = session
            .restore(Some("http://localhost:5173/?name=Ada"))
            .unwrap();
        assert_eq!(*state, AuthState::Anonymous);
    }

    #[test]
    fn test_oauth_redirect_defaults() {
        let session = session_from_redirect("http://localhost/?token=t")
            .unwrap()
            .unwrap();
        assert_eq!(session.user.name, User::OAUTH_FALLBACK_NAME);
        assert!(session.user.email.is_none());
    }

    #[test]
    fn test_invalid_redirect_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = store(dir.path());
        assert!(matches!(
            session.restore(Some("not a url")),
            Err(SessionError::InvalidRedirect(_))
        ));
    }

    #[test]
    fn test_restore_roundtrip_then_logout() {
        let dir = tempfile::tempdir().unwrap();

        // First process: OAuth login persists the session.
        {
            let mut session = store(dir.path());
            session
                .restore(Some("http://localhost/?token=abc&name=Ada"))
                .unwrap();
            assert!(session.is_authenticated());
        }

        // Second process: the stored session is picked up.
        let mut session = store(dir.path());
        session.restore(None).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.current_user().unwrap().name, "Ada");

        // Logout clears both the session file and the task cache.
        std::fs::write(session.task_cache_path(), b"[]").unwrap();
        session.logout().unwrap();
        assert_eq!(*session.state(), AuthState::Anonymous);
        assert!(!dir.path().join(SESSION_FILE).exists());
        assert!(!dir.path().join(TASK_CACHE_FILE).exists());

        // A fresh restore now lands on the anonymous view.
        let mut fresh = store(dir.path());
        assert_eq!(*fresh.restore(None).unwrap(), AuthState::Anonymous);
    }
}
