//! Coordinator lifecycle states.
//!
//! The coordinator is always in exactly one [`CoordinatorState`]. There is no
//! terminal state: after an error or a successful load it keeps accepting
//! intents for the rest of the session.
//!
//! # State Machine
//!
//! ```text
//! Idle ──search──▶ Fetching ──ok──▶ Loaded
//!                     │  ▲            │
//!                   error └─search/page┘
//!                     ▼
//!                  Errored ──search/page──▶ Fetching
//! ```

use crate::catalog::FetchMode;

/// Current phase of the event coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    /// No fetch has been started yet, or the coordinator was shut down.
    #[default]
    Idle,

    /// A fetch is outstanding.
    Fetching {
        /// Query of the outstanding fetch.
        query: String,
        /// Offset of the outstanding fetch.
        start_index: u32,
        /// Whether the page will replace or extend the results.
        mode: FetchMode,
    },

    /// The most recent fetch succeeded.
    Loaded,

    /// The most recent fetch failed. Previous results are still published.
    Errored(String),
}

impl CoordinatorState {
    /// Whether a fetch is outstanding.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching { .. })
    }
}
