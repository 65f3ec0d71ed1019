//! SettingsStore trait with sled and in-memory backends
//!
//! Settings are stored as JSON under a single key in a named sled tree.
//! A record that no longer deserializes is treated as absent so a schema
//! change never prevents startup.

use std::path::Path;
use std::sync::{Arc, RwLock};

use super::Settings;

/// Key the settings record is stored under.
pub const SETTINGS_KEY: &str = "hive_settings";

const SETTINGS_TREE: &str = "settings";

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Trait for pluggable settings backends
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across async tasks.
pub trait SettingsStore: Send + Sync {
    /// Load persisted settings, `None` when nothing usable is stored
    fn load(&self) -> Result<Option<Settings>, StorageError>;

    /// Persist settings, replacing any previous record
    fn save(&self, settings: &Settings) -> Result<(), StorageError>;

    /// Remove the persisted record
    fn clear(&self) -> Result<(), StorageError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

// ============================================================================
// Sled backend
// ============================================================================

#[derive(Clone)]
pub struct SledSettingsStore {
    tree: sled::Tree,
}

impl SledSettingsStore {
    /// Open or create the settings database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path)?;
        tracing::info!(path = %path.display(), "Settings store opened");
        Self::from_db(&db)
    }

    /// Use the settings tree of an already-open database
    pub fn from_db(db: &sled::Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(SETTINGS_TREE)?;
        Ok(Self { tree })
    }
}

impl SettingsStore for SledSettingsStore {
    fn load(&self) -> Result<Option<Settings>, StorageError> {
        let Some(bytes) = self.tree.get(SETTINGS_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted settings");
                Ok(None)
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(settings)?;
        self.tree.insert(SETTINGS_KEY, bytes)?;
        self.tree.flush()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.tree.remove(SETTINGS_KEY)?;
        self.tree.flush()?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sled"
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory store for tests and one-shot runs. Not durable.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    record: Arc<RwLock<Option<Settings>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            record: Arc::new(RwLock::new(Some(settings))),
        }
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, StorageError> {
        let record = self
            .record
            .read()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(*record)
    }

    fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let mut record = self
            .record
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        *record = Some(*settings);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut record = self
            .record
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        *record = None;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
