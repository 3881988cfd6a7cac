//! Terminal view layer.
//!
//! # Architecture
//!
//! ```text
//! ViewChannels → compute_viewmodel → ResultsViewModel → render → stdout
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and their computation from records
//! - [`renderer`]: Plain-text output

pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{
    compute_viewmodel, favorites_viewmodel, BookView, EmptyState, HeaderInfo, ResultsViewModel,
};
