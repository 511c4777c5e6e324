//! store::file_store
//!
//! File-based credential storage.
//!
//! # Security
//!
//! - Credentials are stored in `~/.keeptab/credentials.toml`
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)
//! - Credentials are NEVER logged, printed, or included in error messages

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use async_trait::async_trait;

use super::traits::{StoreError, TokenStore};

/// File-based credential storage.
///
/// Stores credentials in a TOML file at `~/.keeptab/credentials.toml`
/// (or `$KEEPTAB_HOME/credentials.toml` when the override is set).
/// This is the default token store.
///
/// # Security Considerations
///
/// - On Unix, file permissions are set to 0600 (owner read/write only)
/// - Writes are atomic (write to temp file, then rename)
/// - Credential values are never included in error messages or logs
#[derive(Debug)]
pub struct FileTokenStore {
    /// Path to the credentials file
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a new file token store at the default location.
    ///
    /// The default location is `~/.keeptab/credentials.toml`. The
    /// `KEEPTAB_HOME` environment variable overrides the directory,
    /// which keeps tests and sandboxed runs away from the real home.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        let dir = match std::env::var_os("KEEPTAB_HOME") {
            Some(home) => PathBuf::from(home),
            None => dirs::home_dir()
                .ok_or_else(|| StoreError::ReadError("cannot determine home directory".into()))?
                .join(".keeptab"),
        };
        Ok(Self {
            path: dir.join("credentials.toml"),
        })
    }

    /// Create a file token store at a custom path.
    ///
    /// This is primarily useful for testing.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the credentials file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read all credentials from the file.
    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read credentials file: {}", e)))?;

        let entries: HashMap<String, String> = toml::from_str(&content)
            .map_err(|e| StoreError::ReadError(format!("cannot parse credentials file: {}", e)))?;

        Ok(entries)
    }

    /// Write credentials to the file with atomic write and proper permissions.
    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(entries)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize credentials: {}", e)))?;

        // Write to a temp file first for atomicity
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            // Restrictive permissions BEFORE writing content (Unix only)
            #[cfg(unix)]
            {
                let permissions = fs::Permissions::from_mode(0o600);
                file.set_permissions(permissions)
                    .map_err(|e| StoreError::WriteError(format!("cannot set permissions: {}", e)))?;
            }

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write credentials: {}", e)))?;

            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        Ok(())
    }

    /// Verify file permissions are correct (Unix only).
    ///
    /// Returns true if the file doesn't exist or has 0600 permissions.
    #[cfg(unix)]
    pub fn verify_permissions(&self) -> Result<bool, StoreError> {
        if !self.path.exists() {
            return Ok(true);
        }

        let metadata = fs::metadata(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read file metadata: {}", e)))?;

        let mode = metadata.permissions().mode() & 0o777;
        Ok(mode == 0o600)
    }

    /// Verify file permissions are correct (non-Unix always returns true).
    #[cfg(not(unix))]
    pub fn verify_permissions(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.read_all()?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        for key in keys {
            entries.remove(*key);
        }
        self.write_all(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileTokenStore) {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("credentials.toml");
        let store = FileTokenStore::with_path(path);
        (temp, store)
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();

        let result = store.get("nonexistent").await.expect("get");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn set_and_get() {
        let (_temp, store) = create_test_store();

        store.set("auth.access_token", "tok_abc").await.expect("set");

        let result = store.get("auth.access_token").await.expect("get");
        assert_eq!(result, Some("tok_abc".to_string()));
    }

    #[tokio::test]
    async fn set_overwrites() {
        let (_temp, store) = create_test_store();

        store.set("key", "value1").await.expect("first set");
        store.set("key", "value2").await.expect("second set");

        let result = store.get("key").await.expect("get");
        assert_eq!(result, Some("value2".to_string()));
    }

    #[tokio::test]
    async fn remove_many_removes_all_keys() {
        let (_temp, store) = create_test_store();

        store.set("auth.access_token", "a").await.expect("set");
        store.set("auth.refresh_token", "r").await.expect("set");
        store.set("other", "keep").await.expect("set");

        store
            .remove_many(&["auth.access_token", "auth.refresh_token"])
            .await
            .expect("remove_many");

        assert!(store.get("auth.access_token").await.expect("get").is_none());
        assert!(store.get("auth.refresh_token").await.expect("get").is_none());
        assert_eq!(
            store.get("other").await.expect("get"),
            Some("keep".to_string())
        );
    }

    #[tokio::test]
    async fn remove_many_nonexistent_ok() {
        let (_temp, store) = create_test_store();

        store
            .remove_many(&["missing.one", "missing.two"])
            .await
            .expect("remove_many of missing keys");
    }

    #[tokio::test]
    async fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("subdir").join("credentials.toml");
        let store = FileTokenStore::with_path(path.clone());

        assert!(!path.parent().unwrap().exists());

        store.set("key", "value").await.expect("set");

        assert!(path.parent().unwrap().exists());
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn permissions_0600_on_unix() {
        let (_temp, store) = create_test_store();

        store.set("key", "value").await.expect("set");

        let metadata = fs::metadata(store.path()).expect("metadata");
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "permissions should be 0600");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn verify_permissions_works() {
        let (_temp, store) = create_test_store();

        // No file yet - should be ok
        assert!(store.verify_permissions().expect("verify"));

        store.set("key", "value").await.expect("set");
        assert!(store.verify_permissions().expect("verify after write"));
    }

    #[tokio::test]
    async fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("credentials.toml");

        {
            let store = FileTokenStore::with_path(path.clone());
            store.set("key", "value").await.expect("set");
        }

        {
            let store = FileTokenStore::with_path(path);
            let result = store.get("key").await.expect("get");
            assert_eq!(result, Some("value".to_string()));
        }
    }

    #[tokio::test]
    async fn parse_error_is_wrapped() {
        let (_temp, store) = create_test_store();

        fs::create_dir_all(store.path().parent().unwrap()).expect("mkdir");
        fs::write(store.path(), "invalid = [unclosed").expect("write bad toml");

        let err = store.get("key").await.unwrap_err();
        let err_str = err.to_string();
        assert!(
            err_str.contains("cannot parse") || err_str.contains("read"),
            "error should mention parse or read failure: {}",
            err_str
        );
    }

    #[tokio::test]
    async fn special_characters_in_values() {
        let (_temp, store) = create_test_store();

        let special = "value with \"quotes\" and \n newlines and = equals";
        store.set("key", special).await.expect("set");

        let result = store.get("key").await.expect("get");
        assert_eq!(result, Some(special.to_string()));
    }
}
