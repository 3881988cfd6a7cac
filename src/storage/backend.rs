//! Key-value store abstraction.
//!
//! This module defines the [`KeyValueStore`] trait: a minimal string-keyed slot
//! store, which is all the favorites layer needs from persistence. Backends decide
//! how slots are laid out on disk.
//!
//! # Design Philosophy
//!
//! The trait maps directly to the two calls the favorites store makes. It makes
//! no atomicity promise across process crashes beyond "last successful write
//! wins".

use crate::domain::error::Result;

/// Abstraction over persistent string-keyed storage.
///
/// # Implementations
///
/// - [`JsonFileStore`](super::JsonFileStore): JSON file with atomic writes (default)
/// - [`MemoryStore`](super::MemoryStore): process-local map
///
/// # Examples
///
/// ```
/// use bookscout::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::default();
/// store.set("favoritesBooks", "[]")?;
/// assert_eq!(store.get("favoritesBooks")?.as_deref(), Some("[]"));
/// # Ok::<(), bookscout::domain::BookscoutError>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted. Backends must leave
    /// the previous value intact in that case.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}
