//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TASKMART_API_BASE_URL` - Backend base URL (default: `http://127.0.0.1:8000`)
//! - `TASKMART_DATA_DIR` - Directory for the session file and caches
//!   (default: `<platform data dir>/taskmart`)
//! - `TASKMART_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default backend base URL, matching the development server.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set TASKMART_DATA_DIR")]
    NoDataDir,
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Directory holding the session file and cached collections.
    pub data_dir: PathBuf,
    /// Per-request timeout.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = std::env::var("TASKMART_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        let data_dir = match std::env::var("TASKMART_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .map(|dir| dir.join("taskmart"))
                .ok_or(ConfigError::NoDataDir)?,
        };

        let http_timeout = match std::env::var("TASKMART_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "TASKMART_HTTP_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            data_dir,
            http_timeout,
        })
    }

    /// Build a configuration directly, bypassing the environment.
    ///
    /// Useful for tests pointing at a mock backend.
    #[must_use]
    pub fn new(base_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            data_dir: data_dir.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8000/", "/tmp/taskmart");
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("http://localhost:8000", "/tmp/taskmart");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }
}
