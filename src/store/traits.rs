//! store::traits
//!
//! Credential storage trait definition.
//!
//! # Design
//!
//! The `TokenStore` trait defines a small async key-value interface for
//! credentials. Keys are namespaced (e.g., "auth.access_token") to avoid
//! collisions. Lookups for missing keys return `Ok(None)`, never an error.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include credential values in error messages
//! - Use storage mechanisms appropriate to the platform
//! - Be thread-safe (Send + Sync)

use async_trait::async_trait;
use thiserror::Error;

/// Errors from credential storage operations.
///
/// Note: Error messages intentionally do not include credential values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read from credential storage.
    #[error("failed to read credential: {0}")]
    ReadError(String),

    /// Failed to write to credential storage.
    #[error("failed to write credential: {0}")]
    WriteError(String),

    /// Failed to delete from credential storage.
    #[error("failed to delete credential: {0}")]
    DeleteError(String),

    /// Provider not available or not configured.
    #[error("credential provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Trait for credential storage providers.
///
/// Implementations must be thread-safe (Send + Sync) and must never
/// log, print, or include stored values in error messages.
///
/// # Keys
///
/// Keys are namespaced strings like "auth.access_token". The
/// implementation stores them as-is without interpretation.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Get a credential by key.
    ///
    /// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if it does
    /// not. A missing key is not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a credential, overwriting any existing value for the key.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove several credentials in one call.
    ///
    /// Best-effort: every key is attempted even if an earlier one fails,
    /// and the first failure is reported. Removing a key that does not
    /// exist is not an error.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StoreError::ReadError("disk full".into());
        assert!(err.to_string().contains("read"));

        let err = StoreError::WriteError("permission denied".into());
        assert!(err.to_string().contains("write"));

        let err = StoreError::DeleteError("io error".into());
        assert!(err.to_string().contains("delete"));

        let err = StoreError::ProviderNotAvailable("keychain".into());
        assert!(err.to_string().contains("provider"));
    }
}
