//! Platform-specific utilities.
//!
//! - [`paths`]: data directory resolution and tilde expansion

pub mod paths;

pub use paths::{expand_tilde, get_data_dir};
