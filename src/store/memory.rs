//! store::memory
//!
//! In-memory credential storage for tests and embedders that manage
//! persistence themselves.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{StoreError, TokenStore};

/// In-memory token store backed by a mutex-guarded map.
///
/// Contents vanish when the process exits. Used throughout the test
/// suite; also useful for embedders that do not want anything written
/// to disk.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap();
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryTokenStore::new();

        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.remove_many(&["k", "missing"]).await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }
}
