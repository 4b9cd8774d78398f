use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session file name in the session directory
const SESSION_FILE: &str = "session.json";

/// On-disk session record.
///
/// `username` is a leftover from older clients: nothing writes or reads it
/// anymore, but `save` round-trips it and `clear` removes it together with
/// the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// File-backed storage for the bearer token.
///
/// One store is constructed at startup and handed to everything that needs
/// the token. The store owns the persisted bytes; other components re-read
/// it on every call rather than caching.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Persist a token, overwriting any previous one.
    ///
    /// The token is stored exactly as received; no validation is performed.
    pub fn save(&self, token: &str) -> Result<()> {
        let mut record = self.load_record();
        record.token = Some(token.to_string());
        record.saved_at = Some(Utc::now());

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create session directory {}", self.dir.display()))?;
        let contents = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.session_path(), contents).context("Failed to write session file")?;
        Ok(())
    }

    /// The stored token, if any.
    ///
    /// Never fails: a missing, unreadable, or corrupt session file reads as
    /// an empty store.
    pub fn read(&self) -> Option<String> {
        self.load_record().token
    }

    /// When the current token was stored, if known.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.load_record().saved_at
    }

    /// Remove the token and everything stored alongside it.
    ///
    /// Clearing an already-empty store is a no-op, not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session file"),
        }
    }

    fn load_record(&self) -> StoredSession {
        let path = self.session_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return StoredSession::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read session file");
                return StoredSession::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Session file is corrupt, treating as empty");
                StoredSession::default()
            }
        }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_save_then_read_round_trips() {
        let (_dir, store) = temp_store();
        store.save("aaa.bbb.ccc").unwrap();
        assert_eq!(store.read().as_deref(), Some("aaa.bbb.ccc"));
    }

    #[test]
    fn test_save_overwrites_previous_token() {
        let (_dir, store) = temp_store();
        store.save("first.token.sig").unwrap();
        store.save("second.token.sig").unwrap();
        assert_eq!(store.read().as_deref(), Some("second.token.sig"));
    }

    #[test]
    fn test_read_of_empty_store_is_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_read_of_corrupt_file_is_none() {
        let (dir, store) = temp_store();
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.save("aaa.bbb.ccc").unwrap();
        store.clear().unwrap();
        // Second clear on an already-empty store must also succeed.
        store.clear().unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_clear_on_never_written_store_succeeds() {
        let (_dir, store) = temp_store();
        store.clear().unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_save_preserves_legacy_username_field() {
        let (dir, store) = temp_store();
        std::fs::write(
            dir.path().join(SESSION_FILE),
            r#"{"token":"old.token.sig","username":"alice"}"#,
        )
        .unwrap();

        store.save("new.token.sig").unwrap();

        let contents = std::fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
        let record: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(record["token"], "new.token.sig");
        assert_eq!(record["username"], "alice");
    }

    #[test]
    fn test_clear_removes_legacy_username_field_too() {
        let (dir, store) = temp_store();
        std::fs::write(
            dir.path().join(SESSION_FILE),
            r#"{"token":"old.token.sig","username":"alice"}"#,
        )
        .unwrap();

        store.clear().unwrap();

        assert!(!dir.path().join(SESSION_FILE).exists());
        assert_eq!(store.read(), None);
    }

    #[test]
    fn test_save_records_timestamp() {
        let (_dir, store) = temp_store();
        assert!(store.saved_at().is_none());
        store.save("aaa.bbb.ccc").unwrap();
        assert!(store.saved_at().is_some());
    }
}
