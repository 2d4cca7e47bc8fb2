//! Durable session storage: one record, read at startup to rehydrate the
//! session and deleted on logout. Only raw fields are persisted; derived
//! flags are recomputed by [`crate::session::hydrate`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Key under which the single session record is stored.
pub const STORAGE_KEY: &str = "webcom";

/// The persisted shape: raw credentials/token fields only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Seam between the session engine and whatever durable medium backs it.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError>;
    fn save(&self, record: &PersistedSession) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// JSON file under `<dir>/webcom.json`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, record: &PersistedSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("persisting session record to {}", self.path.display());
        fs::write(&self.path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory storage for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<Option<PersistedSession>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        Ok(self.record.lock().map_or(None, |guard| guard.clone()))
    }

    fn save(&self, record: &PersistedSession) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.record.lock() {
            *guard = Some(record.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.record.lock() {
            *guard = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PersistedSession {
        PersistedSession {
            token: "mytoken".to_string(),
            username: "testuser".to_string(),
            email: "testuser@gmail.com".to_string(),
        }
    }

    #[test]
    fn file_storage_round_trips() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());
        assert!(storage.load()?.is_none());

        storage.save(&record())?;
        assert_eq!(storage.load()?, Some(record()));

        storage.clear()?;
        assert!(storage.load()?.is_none());
        Ok(())
    }

    #[test]
    fn file_storage_clear_is_idempotent() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());
        storage.clear()?;
        storage.clear()?;
        Ok(())
    }

    #[test]
    fn file_storage_rejects_corrupt_record() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), "not json")?;
        assert!(matches!(storage.load(), Err(StorageError::Corrupt(_))));
        Ok(())
    }

    #[test]
    fn memory_storage_round_trips() -> anyhow::Result<()> {
        let storage = MemoryStorage::new();
        storage.save(&record())?;
        assert_eq!(storage.load()?, Some(record()));
        storage.clear()?;
        assert!(storage.load()?.is_none());
        Ok(())
    }
}
