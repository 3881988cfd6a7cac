//! JSON file-based key-value store.
//!
//! This module provides a human-readable store using JSON serialization. It uses
//! atomic file writes (write-to-temp + rename) so a crash mid-write never leaves
//! a half-written file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the whole file is loaded into memory once
//! - **Write**: O(n) - every `set` rewrites the whole file
//! - **Best for**: a handful of slots, infrequent writes

use crate::domain::error::{BookscoutError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON store container format.
///
/// This is the top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the file format for future migrations.
    version: u32,

    /// Unix timestamp of the last successful write.
    #[serde(default)]
    updated_at: Option<i64>,

    /// Named string slots.
    #[serde(default)]
    slots: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            updated_at: None,
            slots: BTreeMap::new(),
        }
    }
}

/// JSON file key-value store.
///
/// The entire file is kept in memory and rewritten on every `set`.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is owned by a single favorites store.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "updated_at": 1700000000,
///   "slots": {
///     "favoritesBooks": "[{\"id\":\"zyTCAlFPjgYC\", ...}]"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file, loaded on creation.
    data: StoreData,
}

impl JsonFileStore {
    /// Creates or opens a JSON file store.
    ///
    /// If the file exists and parses, its slots are loaded. A file that cannot be
    /// parsed is treated as empty and logged; it is replaced on the next `set`.
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or an existing
    /// file cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bookscout::storage::JsonFileStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonFileStore::new(PathBuf::from("/tmp/bookscout/favorites.json"))?;
    /// # Ok::<(), bookscout::domain::BookscoutError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path).unwrap_or_else(|e| {
                tracing::warn!(path = ?file_path, error = %e, "store file is corrupt, starting empty");
                StoreData::default()
            })
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(slot_count = data.slots.len(), "store opened");

        Ok(Self { file_path, data })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads store data from a JSON file.
    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| BookscoutError::Persistence(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, slots = data.slots.len(), "loaded store data");
        Ok(data)
    }

    /// Writes `data` to disk using a temp file and rename.
    fn save_to_file(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| BookscoutError::Persistence(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key, len = value.len()).entered();

        let mut next = self.data.clone();
        next.slots.insert(key.to_string(), value.to_string());
        next.updated_at = Some(chrono::Utc::now().timestamp());

        self.save_to_file(&next)?;
        self.data = next;
        Ok(())
    }
}
