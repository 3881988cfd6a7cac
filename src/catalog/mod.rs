//! Catalog access layer.
//!
//! Fetches run as background tasks so the coordinator never blocks on the
//! network. The coordinator sends a [`FetchRequest`], the fetch task answers with
//! a [`FetchCompletion`] tagged with the request's epoch.
//!
//! # Architecture
//!
//! - `client`: [`CatalogClient`] transport trait and its `reqwest` implementation
//! - `fetcher`: [`CatalogFetcher`], one paginated call plus favorite tagging
//! - `messages`: request/completion protocol types

pub mod client;
pub mod fetcher;
pub mod messages;

pub use client::{CatalogClient, HttpCatalogClient, VolumesPage, DEFAULT_BASE_URL};
pub use fetcher::CatalogFetcher;
pub use messages::{FetchCompletion, FetchMode, FetchOutcome, FetchRequest};
