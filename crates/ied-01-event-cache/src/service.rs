//! Cross-ledger cache operations.
//!
//! Every write records an observation: the global id was accepted by
//! that ledger, or the consumer was notified for it. The cache never
//! evicts; eviction is a deployment concern of the backing store.

use crate::keys::{published_events_key, NOTIFIED_EVENTS_KEY};
use crate::ports::SetStore;
use serde::Serialize;
use shared_types::{DistributionError, GlobalId};
use std::sync::Arc;
use tracing::debug;

/// Cardinality snapshot for diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// `(chain id, published-set size)` per configured ledger.
    pub published_per_chain: Vec<(String, u64)>,
    /// Size of the notified set.
    pub notified: u64,
}

/// The cache service all engine subsystems share.
///
/// Failure policy: store errors propagate as `CacheUnavailable`; the
/// call site decides whether the operation it protects survives.
pub struct CrossLedgerCache {
    store: Arc<dyn SetStore>,
}

impl CrossLedgerCache {
    /// Wrap a store.
    pub fn new(store: Arc<dyn SetStore>) -> Self {
        Self { store }
    }

    /// Record that `global_id` is known to exist on `chain_id`.
    /// Idempotent set-add.
    pub async fn mark_published(
        &self,
        chain_id: &str,
        global_id: &GlobalId,
    ) -> Result<(), DistributionError> {
        let newly_added = self
            .store
            .sadd(&published_events_key(chain_id), global_id.as_str())
            .await
            .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))?;
        debug!(chain = chain_id, global_id = %global_id, newly_added, "Marked published");
        Ok(())
    }

    /// Whether `chain_id` is known to carry `global_id`.
    pub async fn is_on_chain(
        &self,
        chain_id: &str,
        global_id: &GlobalId,
    ) -> Result<bool, DistributionError> {
        self.store
            .sismember(&published_events_key(chain_id), global_id.as_str())
            .await
            .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))
    }

    /// Every chain in `chain_ids` not yet known to carry `global_id`.
    ///
    /// N independent membership checks; tolerant of concurrent writes
    /// from sibling engines (a chain marked mid-scan is simply absent
    /// from or present in the result depending on check order, and the
    /// set stays consistent either way).
    pub async fn missing_chains(
        &self,
        global_id: &GlobalId,
        chain_ids: &[String],
    ) -> Result<Vec<String>, DistributionError> {
        let mut missing = Vec::new();
        for chain_id in chain_ids {
            if !self.is_on_chain(chain_id, global_id).await? {
                missing.push(chain_id.clone());
            }
        }
        Ok(missing)
    }

    /// Record that the consumer has been notified for `global_id`.
    pub async fn mark_notified(&self, global_id: &GlobalId) -> Result<(), DistributionError> {
        self.store
            .sadd(NOTIFIED_EVENTS_KEY, global_id.as_str())
            .await
            .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))?;
        debug!(global_id = %global_id, "Marked notified");
        Ok(())
    }

    /// Whether the consumer was already notified for `global_id`.
    pub async fn is_notified(&self, global_id: &GlobalId) -> Result<bool, DistributionError> {
        self.store
            .sismember(NOTIFIED_EVENTS_KEY, global_id.as_str())
            .await
            .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))
    }

    /// Per-chain cardinalities plus the notified-set size.
    pub async fn stats(&self, chain_ids: &[String]) -> Result<CacheStats, DistributionError> {
        let mut published_per_chain = Vec::with_capacity(chain_ids.len());
        for chain_id in chain_ids {
            let size = self
                .store
                .scard(&published_events_key(chain_id))
                .await
                .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))?;
            published_per_chain.push((chain_id.clone(), size));
        }
        let notified = self
            .store
            .scard(NOTIFIED_EVENTS_KEY)
            .await
            .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))?;
        Ok(CacheStats {
            published_per_chain,
            notified,
        })
    }

    /// Store liveness, for the health endpoint.
    pub async fn ping(&self) -> Result<(), DistributionError> {
        self.store
            .ping()
            .await
            .map_err(|e| DistributionError::CacheUnavailable(e.to_string()))
    }
}
