//! Error taxonomy for the API layer.
//!
//! Three failure classes reach callers: network/transport failures,
//! non-2xx responses (carrying the server-provided message when present),
//! and decode failures.

use thiserror::Error;

/// Errors that can occur when talking to the TaskMart backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, transport).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-2xx response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message when present, otherwise a generic one.
        message: String,
    },

    /// Failed to decode a response body.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code of an `Api` error, if that is what this is.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 422,
            message: "The title field is required.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error: 422 - The title field is required."
        );
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_status_only_for_api_errors() {
        let err = ApiError::Parse(serde_json::from_str::<i32>("nope").unwrap_err());
        assert_eq!(err.status(), None);
    }
}
