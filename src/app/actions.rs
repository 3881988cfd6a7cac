//! Actions representing side effects requested by the coordinator.
//!
//! The coordinator never performs I/O itself. After each event it returns a
//! `Vec<Action>` that the controller executes in order: spawning fetch tasks and
//! publishing to the view channels.
//!
//! # Example
//!
//! ```rust
//! use bookscout::app::{Action, Event, EventCoordinator, Intent};
//!
//! let mut coordinator = EventCoordinator::new(3);
//! let actions = coordinator.handle_event(Event::Intent(Intent::search("rust")));
//! assert!(matches!(actions.as_slice(), [Action::StartFetch(_)]));
//! ```

use crate::catalog::FetchRequest;
use crate::domain::BookRecord;

/// Side effects to be executed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Starts a fetch task for the request.
    ///
    /// Any task still running for an earlier request is superseded: its
    /// completion will be discarded by epoch, and the controller may abort it.
    StartFetch(FetchRequest),

    /// Publishes the full accumulated result list to the view.
    PublishResults(Vec<BookRecord>),

    /// Publishes the current error message, or clears it with `None`.
    PublishError(Option<String>),
}
