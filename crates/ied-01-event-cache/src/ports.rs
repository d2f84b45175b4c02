//! # Store Port
//!
//! Outbound port for the key-value store backing the cache. The
//! surface is the minimal set-primitive contract: membership, add,
//! cardinality, liveness. No compound transactions are required;
//! concurrent `sadd` from sibling engines is safe by set semantics.

use async_trait::async_trait;
use thiserror::Error;

/// Store-level failure. The service maps this to the shared
/// `CacheUnavailable` taxonomy entry.
#[derive(Debug, Clone, Error)]
#[error("set store error: {0}")]
pub struct StoreError(pub String);

/// Set-primitive store interface.
#[async_trait]
pub trait SetStore: Send + Sync {
    /// Add `member` to the set at `key`. Returns `true` when the
    /// member was newly added. Re-adding is a no-op, not an error.
    async fn sadd(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Membership check.
    async fn sismember(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    /// Set cardinality; a missing key counts as empty.
    async fn scard(&self, key: &str) -> Result<u64, StoreError>;

    /// Liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Store that fails every operation, for cache-outage tests.
#[derive(Debug, Default)]
pub struct FailingSetStore;

#[async_trait]
impl SetStore for FailingSetStore {
    async fn sadd(&self, _key: &str, _member: &str) -> Result<bool, StoreError> {
        Err(StoreError("connection refused".to_string()))
    }

    async fn sismember(&self, _key: &str, _member: &str) -> Result<bool, StoreError> {
        Err(StoreError("connection refused".to_string()))
    }

    async fn scard(&self, _key: &str) -> Result<u64, StoreError> {
        Err(StoreError("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError("connection refused".to_string()))
    }
}
