//! bookscout: book catalog search with debounced queries and persisted favorites.
//!
//! bookscout provides:
//! - Debounced search-as-you-type with a fallback query for empty input
//! - Incremental "load more" paging that appends to the current results
//! - Most-recent-search-wins sequencing when requests overlap
//! - A favorites list persisted to a JSON file and reflected in every result page

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal View (main.rs, ui/)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!              │ ControllerHandle        ▲ ViewChannels (watch)
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Input filter (debounce, fallback, distinct)      │
//! │  - Event coordinator (epochs, paging, merge)        │
//! │  - Controller loop                                  │
//! └─────────────────────────────────────────────────────┘
//!              │                              │
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │ Catalog Layer (catalog/) │   │ Storage Layer (storage/) │
//! │ - HTTP client            │   │ - Favorites set          │
//! │ - Fetch + tagging        │   │ - JSON file / memory     │
//! └──────────────────────────┘   └──────────────────────────┘
//!              │                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data paths (infrastructure/)                     │
//! │  - Book model and errors (domain/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry spans written to a rotating file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Input filtering, event coordination, and the controller loop
//! - [`catalog`]: Catalog client trait, HTTP implementation, and fetch tagging
//! - [`domain`]: Book records and errors
//! - [`infrastructure`]: Platform paths
//! - [`storage`]: Key-value backends and the favorites store
//! - [`ui`]: View models and plain-text rendering
//! - `observability`: OpenTelemetry tracing to a local file
//!
//! # Configuration
//!
//! ```toml
//! # bookscout.toml
//! api_key = "..."
//! page_size = 10
//! debounce_ms = 500
//! initial_query = "rust programming"
//! favorites_path = "~/books/favorites.json"
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bookscout::{initialize, Config};
//!
//! # async fn demo() -> bookscout::Result<()> {
//! let (controller, handle, mut channels) = initialize(&Config::default())?;
//! tokio::spawn(controller.run());
//!
//! handle.submit("javascript")?;
//! channels.results.changed().await.ok();
//! println!("{:?}", channels.results.borrow().as_ref().map(Vec::len));
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{AppController, ControllerHandle, ViewChannels};
pub use domain::{BookRecord, BookscoutError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{HttpCatalogClient, DEFAULT_BASE_URL};
use crate::storage::{FavoritesStore, JsonFileStore, KeyValueStore, MemoryStore};

const DEFAULT_PAGE_SIZE: u32 = 3;
const DEFAULT_DEBOUNCE_MS: u64 = 800;

/// Runtime configuration.
///
/// Loaded from a TOML file with [`Config::from_file`] and overridden from
/// `key=value` pairs with [`Config::with_overrides`]. Missing keys take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog base URL; `/volumes` is appended. Default: Google Books v1.
    pub api_base_url: String,

    /// Optional API key sent as the `key` query parameter.
    pub api_key: Option<String>,

    /// Items requested per page. Zero falls back to 3.
    pub page_size: u32,

    /// Quiet period before typed input is committed, in milliseconds.
    pub debounce_ms: u64,

    /// Query used when the committed input is empty.
    pub fallback_query: String,

    /// Pushed through the input filter when the controller starts.
    pub initial_query: Option<String>,

    /// Favorites file. Default: `<data dir>/favorites.json`.
    pub favorites_path: Option<PathBuf>,

    /// Tracing filter directive for spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `RUST_LOG`, then `"info"`.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            fallback_query: app::DEFAULT_FALLBACK_QUERY.to_string(),
            initial_query: None,
            favorites_path: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BookscoutError::Io`] if the file cannot be read and
    /// [`BookscoutError::Config`] if it is not valid TOML for this struct.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| BookscoutError::Config(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config.normalized())
    }

    /// Builds configuration from a string map over the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bookscout::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "10".to_string());
    /// map.insert("debounce_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 10);
    /// assert_eq!(config.debounce_ms, 800);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies `key=value` overrides.
    ///
    /// # Parsing Rules
    ///
    /// - Unknown keys are ignored
    /// - Unparsable numbers keep the current value
    /// - Empty strings clear optional values
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let optional = |value: &String| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        for (key, value) in map {
            match key.as_str() {
                "api_base_url" => self.api_base_url = value.trim().to_string(),
                "api_key" => self.api_key = optional(value),
                "page_size" => {
                    self.page_size = value.trim().parse().unwrap_or(self.page_size);
                }
                "debounce_ms" => {
                    self.debounce_ms = value.trim().parse().unwrap_or(self.debounce_ms);
                }
                "fallback_query" => self.fallback_query = value.clone(),
                "initial_query" => self.initial_query = Some(value.clone()),
                "favorites_path" => self.favorites_path = optional(value).map(PathBuf::from),
                "trace_level" => self.trace_level = optional(value),
                other => tracing::debug!(key = other, "ignoring unknown configuration key"),
            }
        }

        self.normalized()
    }

    /// Debounce quiet period.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Resolved location of the favorites file.
    #[must_use]
    pub fn favorites_file(&self) -> PathBuf {
        self.favorites_path
            .clone()
            .unwrap_or_else(|| infrastructure::get_data_dir().join("favorites.json"))
    }

    fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.api_base_url.is_empty() {
            self.api_base_url = DEFAULT_BASE_URL.to_string();
        }
        self.favorites_path = self
            .favorites_path
            .map(|path| infrastructure::expand_tilde(&path.to_string_lossy()));
        self
    }
}

/// Opens the favorites store configured by `config`.
///
/// Falls back to an in-memory store if the favorites file cannot be opened, so
/// the session keeps working without persistence.
#[must_use]
pub fn open_favorites(config: &Config) -> FavoritesStore {
    let path = config.favorites_file();
    let backend: Box<dyn KeyValueStore> = match JsonFileStore::new(path.clone()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "favorites file unavailable, using memory store");
            Box::new(MemoryStore::default())
        }
    };
    FavoritesStore::open(backend)
}

/// Builds a controller wired to the HTTP catalog and the configured favorites file.
///
/// # Errors
///
/// Returns [`BookscoutError::Config`] if the HTTP client cannot be built.
pub fn initialize(config: &Config) -> Result<(AppController, ControllerHandle, ViewChannels)> {
    tracing::debug!(base_url = %config.api_base_url, page_size = config.page_size, "initializing bookscout");

    let client = HttpCatalogClient::from_config(config)?;
    let favorites = open_favorites(config);
    Ok(AppController::new(config, Arc::new(client), favorites))
}
