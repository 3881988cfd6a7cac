//! Application layer coordinating input, fetches, and published state.
//!
//! This module sits between the view (main.rs and `ui`) and the catalog and
//! storage layers. It implements the event-driven core of a search session.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Keystrokes → Input Filter → Intents → Event Coordinator → Actions → Side Effects
//!                                             ↑                          ↓
//!                                             └──── Fetch Completions ───┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the coordinator
//! - [`controller`]: Async loop that owns the session and executes actions
//! - [`handler`]: Event processing, epochs, and result merging
//! - [`input`]: Debounce, fallback, and distinct filtering of typed queries
//! - [`modes`]: Coordinator lifecycle states
//! - [`state`]: Query and pagination state
//!
//! # Example
//!
//! ```rust
//! use bookscout::app::{Event, EventCoordinator, Intent};
//!
//! let mut coordinator = EventCoordinator::new(3);
//! let actions = coordinator.handle_event(Event::Intent(Intent::Page));
//! assert!(actions.is_empty());
//! ```

pub mod actions;
pub mod controller;
pub mod handler;
pub mod input;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use controller::{AppController, Command, ControllerHandle, ViewChannels};
pub use handler::{Event, EventCoordinator, Intent};
pub use input::{QueryInputFilter, DEFAULT_DEBOUNCE, DEFAULT_FALLBACK_QUERY};
pub use modes::CoordinatorState;
pub use state::QueryState;
