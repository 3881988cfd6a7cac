//! Persisted favorites set.
//!
//! [`FavoritesStore`] owns the user's favorite books. It keeps the set in memory,
//! mirrors every change into a [`KeyValueStore`] slot as a JSON array, and
//! publishes a snapshot on a `watch` channel after each change.
//!
//! # Failure Model
//!
//! The in-memory set is the source of truth for the running session. Read
//! failures and corrupt data load as an empty set; write failures are logged and
//! the in-memory change stands.

use crate::domain::BookRecord;
use crate::storage::backend::KeyValueStore;
use tokio::sync::watch;

/// Store slot holding the JSON-serialized favorites array.
pub const FAVORITES_KEY: &str = "favoritesBooks";

/// Owner of the favorites set.
///
/// # Examples
///
/// ```
/// use bookscout::domain::BookRecord;
/// use bookscout::storage::{FavoritesStore, MemoryStore};
///
/// let mut favorites = FavoritesStore::open(Box::new(MemoryStore::default()));
/// let mut book = BookRecord::new("zyTCAlFPjgYC", "The Google Story")?;
///
/// favorites.add(&mut book);
/// assert!(book.is_favorite);
/// assert!(favorites.contains("zyTCAlFPjgYC"));
/// # Ok::<(), bookscout::domain::BookscoutError>(())
/// ```
pub struct FavoritesStore {
    backend: Box<dyn KeyValueStore>,
    favorites: Vec<BookRecord>,
    snapshot_tx: watch::Sender<Vec<BookRecord>>,
}

impl FavoritesStore {
    /// Creates an empty store over `backend` without reading it.
    #[must_use]
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self {
            backend,
            favorites: Vec::new(),
            snapshot_tx,
        }
    }

    /// Creates a store over `backend` and loads the persisted set.
    #[must_use]
    pub fn open(backend: Box<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    /// Replaces the in-memory set with the persisted one and returns it.
    ///
    /// An absent slot, an unreadable backend or a value that is not a JSON array
    /// all yield an empty set. Array items without a usable id are skipped.
    pub fn load(&mut self) -> Vec<BookRecord> {
        let _span = tracing::debug_span!("favorites_load").entered();

        let raw = match self.backend.get(FAVORITES_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read favorites, starting empty");
                None
            }
        };

        self.favorites = raw.map(|raw| Self::decode(&raw)).unwrap_or_default();

        tracing::debug!(count = self.favorites.len(), "favorites loaded");
        self.publish();
        self.favorites.clone()
    }

    /// Marks `record` as favorite and adds it to the set.
    ///
    /// Adding an id that is already present leaves the set unchanged apart from
    /// republishing it.
    pub fn add(&mut self, record: &mut BookRecord) {
        let _span = tracing::debug_span!("favorites_add", id = %record.id).entered();

        record.is_favorite = true;

        if self.contains(&record.id) {
            tracing::debug!("already a favorite");
        } else {
            self.favorites.push(record.clone());
            self.persist();
        }

        self.publish();
    }

    /// Clears the favorite mark on `record` and removes its id from the set.
    pub fn remove(&mut self, record: &mut BookRecord) {
        let _span = tracing::debug_span!("favorites_remove", id = %record.id).entered();

        record.is_favorite = false;

        let before = self.favorites.len();
        self.favorites.retain(|favorite| favorite.id != record.id);

        if self.favorites.len() == before {
            tracing::debug!("not a favorite");
        } else {
            self.persist();
        }

        self.publish();
    }

    /// Adds or removes `record` depending on current membership.
    ///
    /// Returns the new favorite state of the record.
    pub fn toggle(&mut self, record: &mut BookRecord) -> bool {
        if self.contains(&record.id) {
            self.remove(record);
        } else {
            self.add(record);
        }
        record.is_favorite
    }

    /// Returns a copy of the current in-memory set.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BookRecord> {
        self.favorites.clone()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.favorites.iter().any(|favorite| favorite.id == id)
    }

    /// Returns a receiver that always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<BookRecord>> {
        self.snapshot_tx.subscribe()
    }

    fn decode(raw: &str) -> Vec<BookRecord> {
        let items: Vec<serde_json::Value> = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(serde_json::Value::Null) => Vec::new(),
            Ok(other) => {
                tracing::warn!(kind = ?other, "favorites slot is not an array, ignoring it");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "favorites slot is not valid JSON, ignoring it");
                Vec::new()
            }
        };

        let mut favorites: Vec<BookRecord> = Vec::with_capacity(items.len());
        for item in &items {
            match BookRecord::from_raw(item, true) {
                Ok(record) if !favorites.iter().any(|f| f.id == record.id) => favorites.push(record),
                Ok(record) => tracing::debug!(id = %record.id, "dropping duplicate favorite"),
                Err(e) => tracing::warn!(error = %e, "skipping stored favorite"),
            }
        }
        favorites
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.favorites) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "cannot serialize favorites, keeping in-memory copy");
                return;
            }
        };

        if let Err(e) = self.backend.set(FAVORITES_KEY, &json) {
            tracing::warn!(error = %e, "cannot persist favorites, keeping in-memory copy");
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.favorites.clone());
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("favorites", &self.favorites.len())
            .finish_non_exhaustive()
    }
}
