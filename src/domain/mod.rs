//! Domain layer for bookscout.
//!
//! Core value types and errors, independent of transport, storage and
//! presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Book record model and lenient construction from catalog JSON
//!
//! # Examples
//!
//! ```
//! use bookscout::domain::{BookRecord, Result};
//!
//! fn favorite_candidate() -> Result<BookRecord> {
//!     BookRecord::new("zyTCAlFPjgYC", "The Google Story")
//! }
//! ```

pub mod book;
pub mod error;

pub use book::{BookRecord, ImageLinks, ListPrice, SaleInfo, VolumeInfo};
pub use error::{BookscoutError, Result};
