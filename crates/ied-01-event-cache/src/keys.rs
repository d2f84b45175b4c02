//! Cache key layout.
//!
//! Keys are chain-id based, not adapter-name based: chain ids are
//! stable across engine restarts even when adapter names change, so
//! the sets survive redeployments with renamed adapters.

/// Set of global ids for which the consumer has been notified.
pub const NOTIFIED_EVENTS_KEY: &str = "notifiedEvents";

/// Prefix of the per-ledger published-event sets.
const PUBLISHED_EVENTS_PREFIX: &str = "publishedEvents";

/// Key of the published-event set for one ledger.
#[must_use]
pub fn published_events_key(chain_id: &str) -> String {
    format!("{PUBLISHED_EVENTS_PREFIX}:{chain_id}")
}
