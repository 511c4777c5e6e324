//! store::keychain_store
//!
//! Keychain-based credential storage using the OS keychain.
//!
//! # Platform Support
//!
//! This module uses the `keyring` crate which supports:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (via D-Bus)
//!
//! # Feature Flag
//!
//! Only available with the `keychain` feature flag:
//!
//! ```toml
//! keeptab = { version = "0.1", features = ["keychain"] }
//! ```

#[cfg(feature = "keychain")]
use async_trait::async_trait;
#[cfg(feature = "keychain")]
use keyring::Entry;

#[cfg(feature = "keychain")]
use super::traits::{StoreError, TokenStore};

/// Keychain-based credential storage.
///
/// Uses the OS keychain (macOS Keychain, Windows Credential Manager,
/// Linux Secret Service) via the `keyring` crate.
///
/// Only available when compiled with the `keychain` feature.
#[cfg(feature = "keychain")]
#[derive(Debug)]
pub struct KeychainTokenStore {
    /// Service name for keychain entries
    service: String,
}

#[cfg(feature = "keychain")]
impl KeychainTokenStore {
    /// Create a new keychain token store.
    ///
    /// Uses "keeptab" as the service name for all keychain entries.
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            service: "keeptab".to_string(),
        })
    }

    /// Create a keychain token store with a custom service name.
    ///
    /// This is primarily useful for testing to avoid conflicts.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Get the service name.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Create a keyring entry for the given key.
    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Entry::new(&self.service, key)
            .map_err(|e| StoreError::ReadError(format!("cannot create keyring entry: {}", e)))
    }

    fn delete_one(&self, key: &str) -> Result<(), StoreError> {
        let entry = self.entry(key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            // Deleting a missing key is not an error
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::DeleteError(format!(
                "cannot delete from keychain: {}",
                e
            ))),
        }
    }
}

#[cfg(feature = "keychain")]
impl Default for KeychainTokenStore {
    fn default() -> Self {
        Self::new().expect("failed to create KeychainTokenStore")
    }
}

#[cfg(feature = "keychain")]
#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entry = self.entry(key)?;

        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(keyring::Error::Ambiguous(_)) => Err(StoreError::ReadError(
                "ambiguous keychain entry".to_string(),
            )),
            Err(e) => Err(StoreError::ReadError(format!(
                "cannot read from keychain: {}",
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let entry = self.entry(key)?;
        entry
            .set_password(value)
            .map_err(|e| StoreError::WriteError(format!("cannot write to keychain: {}", e)))
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        // Attempt every key even when one fails; report the first failure.
        let mut first_err = None;
        for key in keys {
            if let Err(e) = self.delete_one(key) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(all(test, feature = "keychain"))]
mod tests {
    use super::*;

    #[test]
    fn custom_service_name() {
        let store = KeychainTokenStore::with_service("keeptab-test");
        assert_eq!(store.service(), "keeptab-test");
    }

    #[test]
    fn default_service_name() {
        let store = KeychainTokenStore::new().expect("create store");
        assert_eq!(store.service(), "keeptab");
    }
}
