//! Fetch request and completion message types.
//!
//! This module defines the protocol between the event coordinator and the fetch
//! tasks it starts. Each request carries the epoch of the fetch cycle that issued
//! it, and each completion echoes that epoch back so the coordinator can discard
//! results from superseded cycles.

use crate::domain::BookRecord;

/// How a fetched page is merged into the accumulated result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// The page replaces the result list (new search).
    Replace,

    /// The page is appended to the result list (load more).
    Append,
}

/// A single paginated catalog fetch issued by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Fetch cycle that issued this request.
    pub epoch: u64,

    /// Query text sent to the catalog.
    pub query: String,

    /// Zero-based offset of the first item to return.
    pub start_index: u32,

    /// Maximum number of items to return.
    pub page_size: u32,

    pub mode: FetchMode,
}

impl FetchRequest {
    /// Wraps a fetch result into a completion for this request.
    #[must_use]
    pub fn complete(&self, result: crate::domain::Result<Vec<BookRecord>>) -> FetchCompletion {
        let outcome = match result {
            Ok(books) => FetchOutcome::Loaded { books },
            Err(e) => FetchOutcome::Failed {
                message: e.user_message(),
            },
        };

        FetchCompletion {
            epoch: self.epoch,
            mode: self.mode,
            outcome,
        }
    }
}

/// Result of a fetch, delivered back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCompletion {
    /// Epoch of the request this completion answers.
    pub epoch: u64,

    pub mode: FetchMode,

    pub outcome: FetchOutcome,
}

/// Payload of a [`FetchCompletion`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page was fetched and tagged.
    Loaded {
        /// Records in catalog order.
        books: Vec<BookRecord>,
    },

    /// The fetch failed in transport or decoding.
    Failed {
        /// Human-readable error message.
        message: String,
    },
}
