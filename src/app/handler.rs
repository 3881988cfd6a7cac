//! Event handling and state transition logic.
//!
//! This module implements the [`EventCoordinator`], which turns search intents
//! and fetch completions into state changes and action sequences. It owns the
//! fetch epoch, the pagination state, and the accumulated result list.
//!
//! # Architecture
//!
//! The coordinator follows a unidirectional data flow pattern:
//! 1. Events arrive from the controller loop (intents, completions, favorite changes)
//! 2. [`EventCoordinator::handle_event`] pattern-matches the event type
//! 3. Pagination state, epoch, and results are updated in place
//! 4. Actions are collected and returned for execution
//!
//! # Epochs
//!
//! Every fetch the coordinator starts gets a fresh epoch. A completion is
//! applied only if its epoch equals the current one, so when searches overlap
//! the most recently started fetch wins regardless of the order completions
//! arrive in. Shutdown also advances the epoch, invalidating anything in flight.
//!
//! # Example
//!
//! ```rust
//! use bookscout::app::{Action, Event, EventCoordinator, Intent};
//!
//! let mut coordinator = EventCoordinator::new(3);
//! let first = coordinator.handle_event(Event::Intent(Intent::search("javascript")));
//! assert_eq!(first.len(), 1);
//!
//! // Same query again is a no-op.
//! let again = coordinator.handle_event(Event::Intent(Intent::search("javascript")));
//! assert!(again.is_empty());
//! ```

use crate::app::modes::CoordinatorState;
use crate::app::state::QueryState;
use crate::app::Action;
use crate::catalog::{FetchCompletion, FetchMode, FetchOutcome, FetchRequest};
use crate::domain::BookRecord;

/// User intents that drive fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the results with the first page of `query`.
    Search {
        /// Committed query text, already debounced and defaulted.
        query: String,
    },

    /// Append the next page of the current query.
    Page,
}

impl Intent {
    /// Convenience constructor for [`Intent::Search`].
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search {
            query: query.into(),
        }
    }
}

/// Events processed by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A search or page intent.
    Intent(Intent),

    /// A fetch task finished.
    FetchCompleted(FetchCompletion),

    /// A favorite was toggled. Matching records in the current results are
    /// re-tagged and the list is republished.
    FavoriteChanged {
        /// Identifier of the toggled record.
        id: String,
        /// New favorite flag.
        is_favorite: bool,
    },

    /// The session is ending. Outstanding fetches are invalidated.
    Shutdown,
}

/// Owns fetch sequencing, pagination, and the accumulated results.
#[derive(Debug)]
pub struct EventCoordinator {
    state: CoordinatorState,

    /// Pagination state including any outstanding fetch.
    query: QueryState,

    /// Pagination state of the results currently published.
    settled: QueryState,

    results: Option<Vec<BookRecord>>,
    error: Option<String>,
    epoch: u64,
}

impl EventCoordinator {
    /// Creates an idle coordinator with no results.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        let query = QueryState::new(page_size);
        Self {
            state: CoordinatorState::Idle,
            settled: query.clone(),
            query,
            results: None,
            error: None,
            epoch: 0,
        }
    }

    /// Processes an event, mutates coordinator state, and returns actions to execute.
    ///
    /// The returned vector may be empty when the event requires no side effects
    /// (duplicate search, stale completion, page with nothing to extend).
    pub fn handle_event(&mut self, event: Event) -> Vec<Action> {
        let _span = tracing::debug_span!("handle_event", epoch = self.epoch).entered();

        match event {
            Event::Intent(Intent::Search { query }) => self.search(query),
            Event::Intent(Intent::Page) => self.page(),
            Event::FetchCompleted(completion) => self.complete(completion),
            Event::FavoriteChanged { id, is_favorite } => self.retag(&id, is_favorite),
            Event::Shutdown => {
                self.epoch += 1;
                self.state = CoordinatorState::Idle;
                tracing::debug!(epoch = self.epoch, "coordinator shut down");
                vec![]
            }
        }
    }

    fn search(&mut self, query: String) -> Vec<Action> {
        if self.query.is_current(&query) {
            tracing::debug!(query = %query, "query unchanged, ignoring");
            return vec![];
        }

        self.query.begin_search(query);
        self.start_fetch(FetchMode::Replace)
    }

    fn page(&mut self) -> Vec<Action> {
        if self.state.is_fetching() {
            tracing::debug!("fetch outstanding, ignoring page request");
            return vec![];
        }

        if self.query.advance_page().is_none() {
            tracing::debug!("no current query, ignoring page request");
            return vec![];
        }

        self.start_fetch(FetchMode::Append)
    }

    fn start_fetch(&mut self, mode: FetchMode) -> Vec<Action> {
        let Some(query) = self.query.current_query.clone() else {
            return vec![];
        };

        self.epoch += 1;
        self.state = CoordinatorState::Fetching {
            query: query.clone(),
            start_index: self.query.start_index,
            mode,
        };

        tracing::debug!(
            epoch = self.epoch,
            query = %query,
            start_index = self.query.start_index,
            mode = ?mode,
            "starting fetch"
        );

        vec![Action::StartFetch(FetchRequest {
            epoch: self.epoch,
            query,
            start_index: self.query.start_index,
            page_size: self.query.page_size,
            mode,
        })]
    }

    fn complete(&mut self, completion: FetchCompletion) -> Vec<Action> {
        if completion.epoch != self.epoch || !self.state.is_fetching() {
            tracing::debug!(
                completion_epoch = completion.epoch,
                current_epoch = self.epoch,
                "discarding stale completion"
            );
            return vec![];
        }

        match completion.outcome {
            FetchOutcome::Loaded { books } => {
                tracing::debug!(count = books.len(), mode = ?completion.mode, "fetch loaded");

                let results = match completion.mode {
                    FetchMode::Replace => self.results.insert(books),
                    FetchMode::Append => {
                        let results = self.results.get_or_insert_with(Vec::new);
                        results.extend(books);
                        results
                    }
                };

                let mut actions = vec![Action::PublishResults(results.clone())];
                if self.error.take().is_some() {
                    actions.push(Action::PublishError(None));
                }

                self.settled = self.query.clone();
                self.state = CoordinatorState::Loaded;
                actions
            }
            FetchOutcome::Failed { message } => {
                tracing::warn!(error = %message, "fetch failed");

                self.query = self.settled.clone();
                self.error = Some(message.clone());
                self.state = CoordinatorState::Errored(message.clone());
                vec![Action::PublishError(Some(message))]
            }
        }
    }

    fn retag(&mut self, id: &str, is_favorite: bool) -> Vec<Action> {
        let Some(results) = self.results.as_mut() else {
            return vec![];
        };

        let mut changed = false;
        for book in results.iter_mut().filter(|b| b.id == id) {
            if book.is_favorite != is_favorite {
                book.is_favorite = is_favorite;
                changed = true;
            }
        }

        if changed {
            vec![Action::PublishResults(results.clone())]
        } else {
            vec![]
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &CoordinatorState {
        &self.state
    }

    /// Pagination state including any outstanding fetch.
    #[must_use]
    pub const fn query_state(&self) -> &QueryState {
        &self.query
    }

    /// Accumulated results, `None` until the first successful fetch.
    #[must_use]
    pub fn results(&self) -> Option<&[BookRecord]> {
        self.results.as_deref()
    }

    /// Epoch of the most recently started fetch, or of the last shutdown.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str) -> BookRecord {
        BookRecord::new(id, format!("Title {id}")).expect("valid id")
    }

    fn books(ids: &[&str]) -> Vec<BookRecord> {
        ids.iter().map(|id| book(id)).collect()
    }

    fn start(actions: &[Action]) -> FetchRequest {
        match actions {
            [Action::StartFetch(request)] => request.clone(),
            other => panic!("expected a single StartFetch, got {other:?}"),
        }
    }

    fn loaded(request: &FetchRequest, ids: &[&str]) -> Event {
        Event::FetchCompleted(request.complete(Ok(books(ids))))
    }

    fn failed(request: &FetchRequest, message: &str) -> Event {
        Event::FetchCompleted(request.complete(Err(
            crate::domain::BookscoutError::fetch_failed(message),
        )))
    }

    #[test]
    fn search_then_page_accumulates() {
        let mut coordinator = EventCoordinator::new(3);

        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("javascript"))));
        assert_eq!(first.start_index, 0);
        assert_eq!(first.page_size, 3);
        assert_eq!(first.mode, FetchMode::Replace);

        let actions = coordinator.handle_event(loaded(&first, &["a", "b", "c"]));
        assert!(matches!(actions.as_slice(), [Action::PublishResults(r)] if r.len() == 3));

        let second = start(&coordinator.handle_event(Event::Intent(Intent::Page)));
        assert_eq!(second.start_index, 3);
        assert_eq!(second.mode, FetchMode::Append);
        assert_eq!(second.query, "javascript");

        coordinator.handle_event(loaded(&second, &["d", "e", "f"]));
        let ids: Vec<_> = coordinator
            .results()
            .unwrap_or_default()
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(coordinator.state(), &CoordinatorState::Loaded);
    }

    #[test]
    fn same_query_is_noop() {
        let mut coordinator = EventCoordinator::new(3);
        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        coordinator.handle_event(loaded(&first, &["a"]));
        coordinator.handle_event(Event::Intent(Intent::Page));

        let epoch = coordinator.epoch();
        assert!(coordinator
            .handle_event(Event::Intent(Intent::search("rust")))
            .is_empty());
        assert_eq!(coordinator.epoch(), epoch);
        assert_eq!(coordinator.query_state().start_index, 3);
    }

    #[test]
    fn page_without_query_is_noop() {
        let mut coordinator = EventCoordinator::new(3);
        assert!(coordinator.handle_event(Event::Intent(Intent::Page)).is_empty());
        assert_eq!(coordinator.epoch(), 0);
        assert_eq!(coordinator.state(), &CoordinatorState::Idle);
    }

    #[test]
    fn page_while_fetching_is_ignored() {
        let mut coordinator = EventCoordinator::new(3);
        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        assert!(coordinator.handle_event(Event::Intent(Intent::Page)).is_empty());

        coordinator.handle_event(loaded(&first, &["a", "b", "c"]));
        let second = start(&coordinator.handle_event(Event::Intent(Intent::Page)));
        assert!(coordinator.handle_event(Event::Intent(Intent::Page)).is_empty());
        assert_eq!(second.start_index, 3);
        assert_eq!(coordinator.query_state().start_index, 3);
    }

    #[test]
    fn latest_search_wins_out_of_order() {
        let mut coordinator = EventCoordinator::new(3);
        let a = start(&coordinator.handle_event(Event::Intent(Intent::search("A"))));
        let b = start(&coordinator.handle_event(Event::Intent(Intent::search("B"))));
        assert!(b.epoch > a.epoch);

        let actions = coordinator.handle_event(loaded(&b, &["b1"]));
        assert_eq!(actions.len(), 1);

        assert!(coordinator.handle_event(loaded(&a, &["a1"])).is_empty());
        assert_eq!(coordinator.results().map(|r| r[0].id.as_str()), Some("b1"));
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut coordinator = EventCoordinator::new(3);
        let a = start(&coordinator.handle_event(Event::Intent(Intent::search("A"))));
        let b = start(&coordinator.handle_event(Event::Intent(Intent::search("B"))));
        coordinator.handle_event(loaded(&b, &["b1"]));

        assert!(coordinator.handle_event(failed(&a, "boom")).is_empty());
        assert_eq!(coordinator.state(), &CoordinatorState::Loaded);
    }

    #[test]
    fn failure_keeps_results_and_reverts_query() {
        let mut coordinator = EventCoordinator::new(3);
        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        coordinator.handle_event(loaded(&first, &["a", "b", "c"]));

        let page = start(&coordinator.handle_event(Event::Intent(Intent::Page)));
        let actions = coordinator.handle_event(failed(&page, "HTTP 503"));
        assert_eq!(actions, vec![Action::PublishError(Some("HTTP 503".into()))]);
        assert_eq!(coordinator.results().map(<[_]>::len), Some(3));
        assert_eq!(coordinator.query_state().start_index, 0);
        assert_eq!(
            coordinator.state(),
            &CoordinatorState::Errored("HTTP 503".into())
        );

        // Retrying the page requests the same offset again.
        let retry = start(&coordinator.handle_event(Event::Intent(Intent::Page)));
        assert_eq!(retry.start_index, 3);
        let actions = coordinator.handle_event(loaded(&retry, &["d"]));
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1], Action::PublishError(None));
    }

    #[test]
    fn failed_search_can_be_retried() {
        let mut coordinator = EventCoordinator::new(3);
        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        coordinator.handle_event(failed(&first, "offline"));
        assert_eq!(coordinator.query_state().current_query, None);

        let retry = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        assert_eq!(retry.query, "rust");
        assert_eq!(retry.mode, FetchMode::Replace);
    }

    #[test]
    fn shutdown_invalidates_in_flight() {
        let mut coordinator = EventCoordinator::new(3);
        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        coordinator.handle_event(Event::Shutdown);

        assert!(coordinator.handle_event(loaded(&first, &["a"])).is_empty());
        assert!(coordinator.results().is_none());
        assert_eq!(coordinator.state(), &CoordinatorState::Idle);
    }

    #[test]
    fn favorite_change_retags_results() {
        let mut coordinator = EventCoordinator::new(3);
        let first = start(&coordinator.handle_event(Event::Intent(Intent::search("rust"))));
        coordinator.handle_event(loaded(&first, &["a", "b"]));

        let actions = coordinator.handle_event(Event::FavoriteChanged {
            id: "b".into(),
            is_favorite: true,
        });
        match actions.as_slice() {
            [Action::PublishResults(results)] => {
                assert!(!results[0].is_favorite);
                assert!(results[1].is_favorite);
            }
            other => panic!("unexpected actions {other:?}"),
        }

        assert!(coordinator
            .handle_event(Event::FavoriteChanged {
                id: "missing".into(),
                is_favorite: true,
            })
            .is_empty());
    }
}
