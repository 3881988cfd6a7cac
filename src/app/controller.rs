//! Async controller loop.
//!
//! [`AppController`] is the single task that owns the coordinator, the input
//! filter, and the favorites store. The view talks to it through a
//! [`ControllerHandle`] and observes it through [`ViewChannels`].
//!
//! # Architecture
//!
//! ```text
//! ControllerHandle ──Command──▶ ┌──────────────┐ ──results/error──▶ ViewChannels
//!                               │ AppController│
//!   fetch tasks ──Completion──▶ └──────────────┘ ──favorites───────▶ (FavoritesStore)
//! ```
//!
//! The loop selects over three sources: view commands, the input filter's
//! debounce deadline, and completions from spawned fetch tasks. Events are
//! processed one at a time, so coordinator state is never shared.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::app::handler::{Event, EventCoordinator, Intent};
use crate::app::input::QueryInputFilter;
use crate::app::Action;
use crate::catalog::{CatalogClient, CatalogFetcher, FetchCompletion, FetchOutcome, FetchRequest};
use crate::domain::error::{BookscoutError, Result};
use crate::domain::BookRecord;
use crate::storage::FavoritesStore;
use crate::Config;

/// Requests sent from the view to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw text of the search field after a keystroke. Debounced.
    Input(String),
    /// Explicit search submission. Committed immediately.
    Submit(String),
    LoadMore,
    ToggleFavorite(BookRecord),
    Shutdown,
}

/// Published outputs the view renders from.
#[derive(Debug, Clone)]
pub struct ViewChannels {
    /// Accumulated search results, `None` until the first load.
    pub results: watch::Receiver<Option<Vec<BookRecord>>>,
    /// Favorites in insertion order.
    pub favorites: watch::Receiver<Vec<BookRecord>>,
    /// Latest fetch error, cleared by the next successful fetch.
    pub error: watch::Receiver<Option<String>>,
}

/// Cloneable sender side of the controller.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ControllerHandle {
    /// Reports the current text of the search field.
    pub fn search(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::Input(text.into()))
    }

    /// Searches for `text` without waiting for the debounce period.
    pub fn submit(&self, text: impl Into<String>) -> Result<()> {
        self.send(Command::Submit(text.into()))
    }

    pub fn load_more(&self) -> Result<()> {
        self.send(Command::LoadMore)
    }

    /// Flips the favorite flag of `record` and persists the favorites list.
    pub fn toggle_favorite(&self, record: BookRecord) -> Result<()> {
        self.send(Command::ToggleFavorite(record))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|e| BookscoutError::Controller(format!("controller stopped: {:?}", e.0)))
    }
}

/// Owns the session state and executes coordinator actions.
pub struct AppController {
    coordinator: EventCoordinator,
    input: QueryInputFilter,
    favorites: FavoritesStore,
    fetcher: CatalogFetcher,
    initial_query: Option<String>,

    commands: mpsc::UnboundedReceiver<Command>,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    in_flight: Option<JoinHandle<()>>,

    results_tx: watch::Sender<Option<Vec<BookRecord>>>,
    error_tx: watch::Sender<Option<String>>,
}

impl AppController {
    /// Builds a controller and the channels the view uses to talk to it.
    ///
    /// The controller does nothing until [`AppController::run`] is awaited,
    /// typically inside `tokio::spawn`.
    pub fn new(
        config: &Config,
        client: Arc<dyn CatalogClient>,
        favorites: FavoritesStore,
    ) -> (Self, ControllerHandle, ViewChannels) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (results_tx, results) = watch::channel(None);
        let (error_tx, error) = watch::channel(None);

        let channels = ViewChannels {
            results,
            favorites: favorites.subscribe(),
            error,
        };
        let fetcher = CatalogFetcher::new(client, favorites.subscribe());

        let controller = Self {
            coordinator: EventCoordinator::new(config.page_size),
            input: QueryInputFilter::new(config.debounce(), config.fallback_query.clone()),
            favorites,
            fetcher,
            initial_query: config.initial_query.clone(),
            commands,
            completions_tx,
            completions_rx,
            in_flight: None,
            results_tx,
            error_tx,
        };

        (
            controller,
            ControllerHandle {
                commands: commands_tx,
            },
            channels,
        )
    }

    /// Runs the event loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!(page_size = self.coordinator.query_state().page_size, "controller started");

        if let Some(query) = self.initial_query.take() {
            self.input.push(query, Instant::now());
        }

        loop {
            let deadline = self.input.deadline();

            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(query) = self.input.poll(Instant::now()) {
                        self.dispatch(Event::Intent(Intent::Search { query }));
                    }
                }
                Some(mut completion) = self.completions_rx.recv() => {
                    self.refresh_favorites(&mut completion);
                    self.dispatch(Event::FetchCompleted(completion));
                }
            }
        }

        self.dispatch(Event::Shutdown);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        tracing::info!("controller stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let _span = tracing::debug_span!("handle_command", command = ?command).entered();

        match command {
            Command::Input(text) => self.input.push(text, Instant::now()),
            Command::Submit(text) => {
                let query = self.input.submit(text);
                self.dispatch(Event::Intent(Intent::Search { query }));
            }
            Command::LoadMore => self.dispatch(Event::Intent(Intent::Page)),
            Command::ToggleFavorite(mut record) => {
                let is_favorite = self.favorites.toggle(&mut record);
                self.dispatch(Event::FavoriteChanged {
                    id: record.id,
                    is_favorite,
                });
            }
            Command::Shutdown => {}
        }
    }

    /// Re-tags a landed page against the current favorites.
    ///
    /// The fetcher tags at call time, so a toggle made while the page was in
    /// flight would otherwise land with the old flag.
    fn refresh_favorites(&self, completion: &mut FetchCompletion) {
        let FetchOutcome::Loaded { books } = &mut completion.outcome else {
            return;
        };

        for book in books.iter_mut() {
            let is_favorite = self.favorites.contains(&book.id);
            if book.is_favorite != is_favorite {
                tracing::debug!(id = %book.id, is_favorite, "favorite changed during fetch");
                book.is_favorite = is_favorite;
            }
        }
    }

    fn dispatch(&mut self, event: Event) {
        for action in self.coordinator.handle_event(event) {
            self.execute(action);
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::StartFetch(request) => self.start_fetch(request),
            Action::PublishResults(results) => {
                self.results_tx.send_replace(Some(results));
            }
            Action::PublishError(error) => {
                self.error_tx.send_replace(error);
            }
        }
    }

    fn start_fetch(&mut self, request: FetchRequest) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let fetch = self.fetcher.run(request);
        let completions = self.completions_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let completion = fetch.await;
            if completions.send(completion).is_err() {
                tracing::debug!("controller gone, dropping completion");
            }
        }));
    }
}

impl std::fmt::Debug for AppController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("coordinator", &self.coordinator)
            .field("input", &self.input)
            .field("favorites", &self.favorites)
            .finish_non_exhaustive()
    }
}
