use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::User;

/// Storage key for the access token
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token
const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key for the cached identity record
const USER_KEY: &str = "user";

/// Durable key-value store for the session: access token, refresh token, and
/// the cached user record, one file per key under the data directory.
///
/// Pure storage with no coordination logic: every operation is synchronous and
/// idempotent. Reads fail soft (a missing or corrupt entry reads as absent);
/// writes report I/O errors.
pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.entry_path(key), value)
            .with_context(|| format!("Failed to write {} entry", key))
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.entry_path(key)).ok()
    }

    fn remove_entry(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "Failed to remove session entry");
            }
        }
    }

    pub fn set_access_token(&self, token: &str) -> Result<()> {
        self.write_entry(ACCESS_TOKEN_KEY, token)
    }

    pub fn access_token(&self) -> Option<String> {
        self.read_entry(ACCESS_TOKEN_KEY)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.write_entry(REFRESH_TOKEN_KEY, token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_entry(REFRESH_TOKEN_KEY)
    }

    pub fn set_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).context("Failed to serialize user record")?;
        self.write_entry(USER_KEY, &json)
    }

    /// The cached user record. A missing or malformed entry reads as `None`;
    /// corruption never surfaces as an error.
    pub fn user(&self) -> Option<User> {
        let raw = self.read_entry(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "Stored user record is malformed, treating as absent");
                None
            }
        }
    }

    /// Check if both tokens are present.
    pub fn has_tokens(&self) -> bool {
        self.access_token().is_some() && self.refresh_token().is_some()
    }

    /// Remove every stored entry. Idempotent; safe to call on an empty store.
    pub fn clear_all(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            self.remove_entry(&self.entry_path(key));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session")).unwrap();
        (dir, store)
    }

    fn test_user() -> User {
        User {
            id: 42,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_active: Some(true),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let (_dir, store) = test_store();
        assert!(store.access_token().is_none());

        store.set_access_token("access-abc").unwrap();
        store.set_refresh_token("refresh-xyz").unwrap();

        assert_eq!(store.access_token().as_deref(), Some("access-abc"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-xyz"));
        assert!(store.has_tokens());
    }

    #[test]
    fn test_user_round_trip() {
        let (_dir, store) = test_store();
        let user = test_user();

        store.set_user(&user).unwrap();
        assert_eq!(store.user(), Some(user));
    }

    #[test]
    fn test_malformed_user_reads_as_absent() {
        let (_dir, store) = test_store();
        std::fs::write(store.entry_path(USER_KEY), "{not json").unwrap();
        assert!(store.user().is_none());
    }

    #[test]
    fn test_overwrite_is_idempotent() {
        let (_dir, store) = test_store();
        store.set_access_token("first").unwrap();
        store.set_access_token("second").unwrap();
        assert_eq!(store.access_token().as_deref(), Some("second"));
    }

    #[test]
    fn test_clear_all() {
        let (_dir, store) = test_store();
        store.set_access_token("a").unwrap();
        store.set_refresh_token("r").unwrap();
        store.set_user(&test_user()).unwrap();

        store.clear_all();

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.user().is_none());
        assert!(!store.has_tokens());

        // Clearing an already-empty store is fine.
        store.clear_all();
    }
}
