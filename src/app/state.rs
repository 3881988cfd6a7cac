//! Pagination state owned by the coordinator.
//!
//! [`QueryState`] records which query the coordinator is working on and which
//! offset it has reached. It is an explicit value rather than something inferred
//! from the last emitted query, so the "same query is a no-op" rule can be
//! checked directly.

/// Current query and pagination offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Query of the current result list or outstanding search, `None` before the first search.
    pub current_query: Option<String>,

    /// Offset of the last requested page.
    pub start_index: u32,

    /// Items per page. Always positive, fixed for the coordinator's lifetime.
    pub page_size: u32,
}

impl QueryState {
    /// Creates an empty state. A `page_size` of zero is raised to one.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            current_query: None,
            start_index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Returns whether `query` is the current query.
    #[must_use]
    pub fn is_current(&self, query: &str) -> bool {
        self.current_query.as_deref() == Some(query)
    }

    /// Switches to a new query, resetting the offset to zero.
    pub fn begin_search(&mut self, query: impl Into<String>) {
        self.current_query = Some(query.into());
        self.start_index = 0;
    }

    /// Advances to the next page of the current query.
    ///
    /// Returns the new offset, or `None` if there is no current query.
    pub fn advance_page(&mut self) -> Option<u32> {
        self.current_query.as_ref()?;
        self.start_index = self.start_index.saturating_add(self.page_size);
        Some(self.start_index)
    }
}
