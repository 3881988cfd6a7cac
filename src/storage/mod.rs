//! Storage layer for persisted favorites.
//!
//! This module provides the key-value persistence abstraction and the favorites
//! set built on top of it.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait for string-keyed slot stores
//! - `json`: JSON file store with atomic writes
//! - `memory`: in-memory store
//! - `favorites`: [`FavoritesStore`], the owned favorites set and its change stream

pub mod backend;
pub mod favorites;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
