//! api::error
//!
//! Error taxonomy for the authenticated API surface.
//!
//! The load-bearing distinction: [`ApiError::Network`] means no server
//! response reached the client at all, and is propagated unchanged.
//! Connectivity loss is never treated as an authentication failure.

use thiserror::Error;

/// Errors from API operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No server response reached the client (offline, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Authentication failed and could not be recovered by a refresh.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned an error.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
}

impl ApiError {
    /// Check if this error means the user must authenticate again.
    pub fn needs_login(&self) -> bool {
        matches!(self, ApiError::AuthFailed(_))
    }

    /// Check if this error is a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ApiError::Network("connection refused".into());
        assert!(err.to_string().contains("network"));

        let err = ApiError::AuthFailed("invalid or expired token".into());
        assert!(err.to_string().contains("authentication failed"));

        let err = ApiError::NotFound("loan 42".into());
        assert!(err.to_string().contains("not found"));

        let err = ApiError::Api {
            status: 500,
            message: "internal error".into(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn classification() {
        assert!(ApiError::AuthFailed("x".into()).needs_login());
        assert!(!ApiError::Network("x".into()).needs_login());

        assert!(ApiError::Network("x".into()).is_transient());
        assert!(!ApiError::AuthFailed("x".into()).is_transient());
    }
}
