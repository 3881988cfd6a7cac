//! Debounced query input.
//!
//! [`QueryInputFilter`] turns a stream of raw keystroke values into committed
//! search queries. A value is committed once no newer value has arrived for the
//! quiet period. An empty value is replaced by the fallback query, and a value
//! equal to the previously committed one is suppressed.
//!
//! The filter holds no timers. The caller passes in the current [`Instant`] and
//! sleeps until [`QueryInputFilter::deadline`] itself, which keeps the filter
//! deterministic under tokio's paused test clock.

use std::time::Duration;
use tokio::time::Instant;

/// Quiet period before a typed value is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// Query used when the input is empty.
pub const DEFAULT_FALLBACK_QUERY: &str = "You don't know JS";

#[derive(Debug, Clone)]
struct Pending {
    value: String,
    deadline: Instant,
}

/// Debounce, fallback, and distinct filtering for raw input values.
#[derive(Debug, Clone)]
pub struct QueryInputFilter {
    quiet_period: Duration,
    fallback: String,
    pending: Option<Pending>,

    /// Last committed raw value, before the fallback substitution.
    last_committed: Option<String>,
}

impl QueryInputFilter {
    pub fn new(quiet_period: Duration, fallback: impl Into<String>) -> Self {
        Self {
            quiet_period,
            fallback: fallback.into(),
            pending: None,
            last_committed: None,
        }
    }

    /// Records a raw input value, restarting the quiet period.
    pub fn push(&mut self, raw: impl Into<String>, now: Instant) {
        let value = raw.into();
        tracing::trace!(value = %value, "input pushed");
        self.pending = Some(Pending {
            value,
            deadline: now + self.quiet_period,
        });
    }

    /// When the pending value becomes eligible for commit, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Commits the pending value if its quiet period has elapsed.
    ///
    /// Returns the query to search for, or `None` if nothing is due or the
    /// value equals the previously committed one.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.deadline()? > now {
            return None;
        }

        let pending = self.pending.take()?;
        if self.last_committed.as_deref() == Some(pending.value.as_str()) {
            tracing::debug!(value = %pending.value, "input unchanged, suppressing");
            return None;
        }

        Some(self.commit(pending.value))
    }

    /// Commits `raw` immediately, discarding any pending value.
    ///
    /// Explicit submissions skip the distinct check. The coordinator still
    /// ignores a query identical to the current one.
    pub fn submit(&mut self, raw: impl Into<String>) -> String {
        self.pending = None;
        self.commit(raw.into())
    }

    fn commit(&mut self, value: String) -> String {
        let query = if value.is_empty() {
            self.fallback.clone()
        } else {
            value.clone()
        };

        tracing::debug!(query = %query, "query committed");
        self.last_committed = Some(value);
        query
    }
}

impl Default for QueryInputFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, DEFAULT_FALLBACK_QUERY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn rapid_typing_commits_last_value_once() {
        let mut filter = QueryInputFilter::default();
        let t0 = Instant::now();

        filter.push("a", t0);
        filter.push("ab", t0 + MS * 300);
        filter.push("abc", t0 + MS * 600);

        assert_eq!(filter.poll(t0 + MS * 1000), None);
        assert_eq!(filter.deadline(), Some(t0 + MS * 1400));
        assert_eq!(filter.poll(t0 + MS * 1400), Some("abc".to_string()));
        assert_eq!(filter.deadline(), None);
        assert_eq!(filter.poll(t0 + MS * 5000), None);
    }

    #[test]
    fn spaced_values_each_commit() {
        let mut filter = QueryInputFilter::default();
        let t0 = Instant::now();

        filter.push("a", t0);
        assert_eq!(filter.poll(t0 + MS * 800), Some("a".to_string()));
        filter.push("ab", t0 + MS * 900);
        assert_eq!(filter.poll(t0 + MS * 1700), Some("ab".to_string()));
    }

    #[test]
    fn empty_input_uses_fallback() {
        let mut filter = QueryInputFilter::default();
        let t0 = Instant::now();

        filter.push("", t0);
        assert_eq!(
            filter.poll(t0 + DEFAULT_DEBOUNCE),
            Some(DEFAULT_FALLBACK_QUERY.to_string())
        );
    }

    #[test]
    fn whitespace_is_a_real_value() {
        let mut filter = QueryInputFilter::default();
        assert_eq!(filter.submit("  "), "  ");
        assert_eq!(filter.submit(""), DEFAULT_FALLBACK_QUERY);
    }

    #[test]
    fn identical_value_is_suppressed() {
        let mut filter = QueryInputFilter::new(MS * 100, "fallback");
        let t0 = Instant::now();

        filter.push("rust", t0);
        assert_eq!(filter.poll(t0 + MS * 100), Some("rust".to_string()));

        filter.push("rus", t0 + MS * 200);
        filter.push("rust", t0 + MS * 250);
        assert_eq!(filter.poll(t0 + MS * 350), None);

        filter.push("rusty", t0 + MS * 400);
        assert_eq!(filter.poll(t0 + MS * 500), Some("rusty".to_string()));
    }

    #[test]
    fn distinct_compares_raw_values() {
        let mut filter = QueryInputFilter::new(MS * 100, "fallback");
        let t0 = Instant::now();

        filter.push("fallback", t0);
        assert_eq!(filter.poll(t0 + MS * 100), Some("fallback".to_string()));

        filter.push("", t0 + MS * 200);
        assert_eq!(filter.poll(t0 + MS * 300), Some("fallback".to_string()));
    }

    #[test]
    fn submit_cancels_pending() {
        let mut filter = QueryInputFilter::default();
        let t0 = Instant::now();

        filter.push("draft", t0);
        assert_eq!(filter.submit("final"), "final");
        assert_eq!(filter.deadline(), None);
        assert_eq!(filter.poll(t0 + DEFAULT_DEBOUNCE), None);

        assert_eq!(filter.submit("final"), "final");
    }
}
