//! session::errors
//!
//! Error types for session and credential-exchange operations.
//!
//! # Security
//!
//! Error messages intentionally never include token values. Anything
//! that could carry a credential is reduced to a status code and the
//! server's message text.

use thiserror::Error;

/// Errors from session operations (login, refresh, bootstrap).
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The server rejected the presented credentials.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// No stored refresh token exists, so the session cannot be refreshed.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Token refresh was rejected by the server.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Error from credential storage.
    #[error("credential store error: {0}")]
    Store(String),

    /// Network error: no server response reached the client.
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected API response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the server
        message: String,
    },
}

impl SessionError {
    /// Check if this error means the user must authenticate again.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            SessionError::NotAuthenticated
                | SessionError::LoginFailed(_)
                | SessionError::RefreshFailed(_)
        )
    }

    /// Check if this error is a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionError::Network(_))
    }
}

impl From<crate::store::StoreError> for SessionError {
    fn from(err: crate::store::StoreError) -> Self {
        SessionError::Store(err.to_string())
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_login_classification() {
        assert!(SessionError::NotAuthenticated.needs_login());
        assert!(SessionError::LoginFailed("bad password".into()).needs_login());
        assert!(SessionError::RefreshFailed("expired".into()).needs_login());

        assert!(!SessionError::Network("offline".into()).needs_login());
        assert!(!SessionError::Store("disk".into()).needs_login());
    }

    #[test]
    fn is_transient_classification() {
        assert!(SessionError::Network("timeout".into()).is_transient());
        assert!(!SessionError::NotAuthenticated.is_transient());
    }

    #[test]
    fn error_messages_never_contain_token_patterns() {
        let errors = vec![
            SessionError::LoginFailed("invalid email or password".into()),
            SessionError::NotAuthenticated,
            SessionError::RefreshFailed("refresh token expired".into()),
            SessionError::Store("write failed".into()),
            SessionError::Network("connection refused".into()),
            SessionError::Api {
                status: 500,
                message: "internal error".into(),
            },
        ];

        for err in errors {
            let msg = err.to_string();
            assert!(
                !msg.contains("Bearer "),
                "error message leaks a bearer token: {}",
                msg
            );
        }
    }
}
