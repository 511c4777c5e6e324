//! store
//!
//! Credential storage abstraction for tokens.
//!
//! # Architecture
//!
//! Credentials are stored through the `TokenStore` trait, which has
//! multiple implementations:
//!
//! - [`FileTokenStore`]: Stores in `~/.keeptab/credentials.toml` (default)
//! - [`KeychainTokenStore`]: Uses OS keychain (optional, feature-gated)
//! - [`MemoryTokenStore`]: In-process map, for tests and embedders
//!
//! # Security
//!
//! All token store implementations follow these rules:
//!
//! - Credential values are **never** logged or included in error messages
//! - File store uses 0600 permissions on Unix (owner read/write only)
//! - All file writes are atomic (temp file + rename)
//!
//! # Provider Selection
//!
//! Use [`create_store`] to create a token store based on configuration:
//!
//! ```ignore
//! use keeptab::store::create_store;
//!
//! // Default file-based store
//! let store = create_store("file")?;
//!
//! // Keychain store (requires feature flag)
//! let store = create_store("keychain")?;
//! ```

mod file_store;
mod keychain_store;
mod memory;
mod traits;

pub use file_store::FileTokenStore;
#[cfg(feature = "keychain")]
pub use keychain_store::KeychainTokenStore;
pub use memory::MemoryTokenStore;
pub use traits::{StoreError, TokenStore};

use std::sync::Arc;

/// Create a token store based on the provider name.
///
/// # Providers
///
/// - `"file"` (default): [`FileTokenStore`] storing in `~/.keeptab/credentials.toml`
/// - `"keychain"`: [`KeychainTokenStore`] using the OS keychain (requires feature)
/// - `"memory"`: [`MemoryTokenStore`] with no persistence
///
/// # Errors
///
/// - Unknown provider name
/// - Keychain provider without the `keychain` feature enabled
/// - Initialization errors from the store
pub fn create_store(provider: &str) -> Result<Arc<dyn TokenStore>, StoreError> {
    match provider {
        "file" => Ok(Arc::new(FileTokenStore::new()?)),
        "memory" => Ok(Arc::new(MemoryTokenStore::new())),
        #[cfg(feature = "keychain")]
        "keychain" => Ok(Arc::new(KeychainTokenStore::new()?)),
        #[cfg(not(feature = "keychain"))]
        "keychain" => Err(StoreError::ProviderNotAvailable(
            "keychain support not enabled (compile with --features keychain)".into(),
        )),
        other => Err(StoreError::ProviderNotAvailable(format!(
            "unknown credential provider: '{}' (valid: file, keychain, memory)",
            other
        ))),
    }
}

/// The default token store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_memory_store() {
        let store = create_store("memory").expect("create memory store");
        assert!(store.get("nonexistent").await.expect("get").is_none());
    }

    #[test]
    fn create_unknown_provider() {
        let result = create_store("unknown");
        match result {
            Err(StoreError::ProviderNotAvailable(msg)) => {
                assert!(msg.contains("unknown"));
            }
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn create_keychain_without_feature() {
        let result = create_store("keychain");
        match result {
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("keychain"), "error should mention keychain");
                assert!(
                    msg.contains("not enabled"),
                    "error should mention not enabled"
                );
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn default_provider_constant() {
        assert_eq!(DEFAULT_PROVIDER, "file");
    }
}
