//! Paginated catalog fetch with favorite tagging.
//!
//! [`CatalogFetcher`] performs one catalog call per fetch and turns the raw items
//! into [`BookRecord`]s. Each record's `is_favorite` flag is computed from the
//! favorites snapshot taken when `fetch` is called, before the request is awaited.
//! Changes to the favorites set while the request is in flight do not affect the
//! returned page.

use crate::catalog::client::CatalogClient;
use crate::catalog::messages::{FetchCompletion, FetchRequest};
use crate::domain::error::Result;
use crate::domain::BookRecord;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

/// Wraps a [`CatalogClient`] and tags results against the favorites set.
///
/// Cheap to clone; clones share the client and the favorites receiver.
#[derive(Clone)]
pub struct CatalogFetcher {
    client: Arc<dyn CatalogClient>,
    favorites: watch::Receiver<Vec<BookRecord>>,
}

impl CatalogFetcher {
    /// Creates a fetcher reading favorites from the store's snapshot channel.
    ///
    /// The receiver comes from [`FavoritesStore::subscribe`](crate::storage::FavoritesStore::subscribe).
    #[must_use]
    pub fn new(client: Arc<dyn CatalogClient>, favorites: watch::Receiver<Vec<BookRecord>>) -> Self {
        Self { client, favorites }
    }

    /// Returns the ids in the current favorites snapshot.
    #[must_use]
    pub fn favorite_ids(&self) -> HashSet<String> {
        self.favorites
            .borrow()
            .iter()
            .map(|favorite| favorite.id.clone())
            .collect()
    }

    /// Fetches one page of records for `query`.
    ///
    /// The favorites snapshot is captured immediately; the returned future owns
    /// everything it needs and can be spawned. Items without a usable id are
    /// skipped; every other item is kept with best-effort fields.
    ///
    /// # Errors
    ///
    /// The future resolves to [`BookscoutError::FetchFailed`](crate::domain::BookscoutError::FetchFailed)
    /// if the catalog call fails. No retry is attempted.
    pub fn fetch(
        &self,
        query: &str,
        start_index: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<BookRecord>>> + Send + 'static {
        let favorite_ids = self.favorite_ids();
        let client = Arc::clone(&self.client);
        let query = query.to_string();
        let span = tracing::debug_span!("fetch", query = %query, start_index, page_size);

        async move {
            let page = client.get_volumes(&query, start_index, page_size).await?;
            let books = tag_page(page.into_items(), &favorite_ids);
            tracing::debug!(count = books.len(), "page fetched");
            Ok(books)
        }
        .instrument(span)
    }

    /// Executes `request` and wraps the result into a completion carrying its epoch.
    pub fn run(&self, request: FetchRequest) -> impl Future<Output = FetchCompletion> + Send + 'static {
        let fetch = self.fetch(&request.query, request.start_index, request.page_size);
        async move {
            let result = fetch.await;
            request.complete(result)
        }
    }
}

impl std::fmt::Debug for CatalogFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogFetcher")
            .field("favorites", &self.favorites.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Builds records from raw items, marking those whose id is in `favorite_ids`.
fn tag_page(items: Vec<serde_json::Value>, favorite_ids: &HashSet<String>) -> Vec<BookRecord> {
    items
        .iter()
        .enumerate()
        .filter_map(|(position, raw)| {
            let is_favorite = raw
                .get("id")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|id| favorite_ids.contains(id.trim()));

            match BookRecord::from_raw(raw, is_favorite) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(position, error = %e, "skipping catalog item");
                    None
                }
            }
        })
        .collect()
}
