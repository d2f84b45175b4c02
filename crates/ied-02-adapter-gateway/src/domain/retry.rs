//! Retry policy.

use std::time::Duration;

/// Bounded retry budget with linear backoff.
///
/// Attempt `n` (1-based) that fails retryably is followed by a wait of
/// `retry_delay × n` before attempt `n + 1`. Total wall time is bounded
/// by `max_attempts × (attempt timeout + retry_delay × attempt)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first.
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1_000),
        }
    }
}

impl RetryPolicy {
    /// Backoff to wait after a failed `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }

    /// Whether `attempt` (1-based) was the last one allowed.
    #[must_use]
    pub fn is_final(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }
}
