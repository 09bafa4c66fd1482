// File: src/persistence.rs
use crate::core::session::{PartialSession, Session};
use crate::error::PersistenceError;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// SHA-256 of the raw word-list text, hex encoded. Gates reparsing.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Where the session snapshot lives between runs.
pub trait PersistenceStore {
    /// Reads whatever was saved last. A missing or unreadable record yields
    /// an empty partial so the caller falls back to defaults.
    fn load(&mut self) -> PartialSession;

    /// Writes the whole session.
    fn save(&mut self, session: &Session) -> Result<(), PersistenceError>;
}

/// Keeps the session as a single JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for JsonFileStore {
    fn load(&mut self) -> PartialSession {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No saved session, starting fresh");
                return PartialSession::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read saved session");
                return PartialSession::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(partial) => {
                tracing::info!(path = %self.path.display(), "Loaded session");
                partial
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding malformed session record");
                PartialSession::default()
            }
        }
    }

    /// Atomic write: serialize into a temp file next to the target, then
    /// rename it over the target.
    fn save(&mut self, session: &Session) -> Result<(), PersistenceError> {
        let parent_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir).map_err(|e| PersistenceError::Io {
            operation: "create directory for",
            path: parent_dir.to_path_buf(),
            source: e,
        })?;

        let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| PersistenceError::Io {
            operation: "create",
            path: parent_dir.to_path_buf(),
            source: e,
        })?;

        {
            let mut writer = BufWriter::new(temp_file.as_file_mut());
            serde_json::to_writer(&mut writer, session)
                .map_err(|e| PersistenceError::Serialization { source: e })?;
            writer.flush().map_err(|e| PersistenceError::Io {
                operation: "write",
                path: self.path.clone(),
                source: e,
            })?;
        }

        temp_file
            .persist(&self.path)
            .map_err(|e| PersistenceError::AtomicWriteFailed {
                path: self.path.clone(),
                source: e.error,
            })?;

        tracing::debug!(path = %self.path.display(), "Saved session");
        Ok(())
    }
}

/// Holds the record in memory, going through the same JSON layout as the
/// file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<serde_json::Value>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw record, as if a previous run had saved it.
    pub fn with_record(record: serde_json::Value) -> Self {
        Self { record: Some(record), saves: 0 }
    }

    pub fn record(&self) -> Option<&serde_json::Value> {
        self.record.as_ref()
    }

    /// The last saved session, decoded.
    pub fn saved(&self) -> Option<Session> {
        serde_json::from_value(self.record.clone()?).ok()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&mut self) -> PartialSession {
        let Some(record) = self.record.clone() else {
            return PartialSession::default();
        };
        serde_json::from_value(record).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding malformed session record");
            PartialSession::default()
        })
    }

    fn save(&mut self, session: &Session) -> Result<(), PersistenceError> {
        let record = serde_json::to_value(session).map_err(|e| PersistenceError::Serialization { source: e })?;
        self.record = Some(record);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::parse_groups;
    use tempfile::tempdir;

    #[test]
    fn test_content_hash() {
        // Known SHA-256 hash for "Hello, World!"
        assert_eq!(
            content_hash("Hello, World!"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
        assert_ne!(content_hash("a|b\nx"), content_hash("a|b\ny"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut store = JsonFileStore::new(&path);

        let session = Session {
            dark_mode: true,
            groups: parse_groups("a(b)|x\nab,1,def\n"),
            source_hash: Some("hash".into()),
            current_group_index: 0,
            current_word_index: None,
            mask_enabled: true,
        };
        store.save(&session).unwrap();
        assert!(path.exists());

        let loaded = Session::from_partial(store.load());
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), PartialSession::default());
    }

    #[test]
    fn test_malformed_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load(), PartialSession::default());
    }

    #[test]
    fn test_memory_store_discards_wrongly_typed_record() {
        let mut store = MemoryStore::with_record(serde_json::json!({ "darkMode": "yes" }));
        assert_eq!(store.load(), PartialSession::default());

        store.save(&Session::default()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.saved(), Some(Session::default()));
    }
}
