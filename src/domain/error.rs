//! Error types for bookscout.
//!
//! This module defines the centralized error type [`BookscoutError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! None of these errors are fatal to a running session. Fetch failures are
//! reported to the view, persistence failures and malformed records are logged
//! and the last good state is kept.

use thiserror::Error;

/// The main error type for bookscout operations.
///
/// # Examples
///
/// ```
/// use bookscout::domain::BookscoutError;
///
/// let err = BookscoutError::fetch_failed("connection reset");
/// assert_eq!(err.to_string(), "Fetch failed: connection reset");
/// ```
#[derive(Debug, Error)]
pub enum BookscoutError {
    /// A catalog request failed in transport or while decoding the response.
    ///
    /// Recovered at the coordinator boundary and surfaced to the view as an
    /// error message. Never retried by the core.
    #[error("Fetch failed: {message}")]
    FetchFailed {
        /// Human-readable failure text shown to the user.
        message: String,
    },

    /// Reading from or writing to the persistent store failed.
    ///
    /// Logged only. The in-memory favorites remain the source of truth.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A single catalog item could not be turned into a record.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The controller task is no longer running.
    #[error("Controller communication error: {0}")]
    Controller(String),
}

impl BookscoutError {
    /// Builds a [`BookscoutError::FetchFailed`] from any displayable message.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    /// Returns the text that should be published to the view for this error.
    ///
    /// For fetch failures this is the bare message, without the variant prefix.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::FetchFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A specialized `Result` type for bookscout operations.
pub type Result<T> = std::result::Result<T, BookscoutError>;
