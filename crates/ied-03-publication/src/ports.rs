//! Inbound port of the publication subsystem.

use async_trait::async_trait;
use serde::Serialize;
use shared_types::{AdapterOutcome, DistributionError, PublishEventRequest};

/// Aggregate result of one fan-out publication.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    /// True when at least one adapter accepted the event.
    pub success: bool,

    /// Timestamp of the first successful acceptance, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    /// Per-adapter rows, in registry order.
    pub adapters: Vec<AdapterOutcome>,
}

impl PublishReport {
    /// Number of adapters that accepted the event.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.adapters.iter().filter(|a| a.success).count()
    }
}

/// Publication service - inbound port.
#[async_trait]
pub trait PublicationApi: Send + Sync {
    /// Fan the publication out to every configured ledger.
    ///
    /// Fails with `MissingGlobalId` before any adapter is contacted
    /// when `data_location` carries no usable `hl` parameter, and with
    /// `AllAdaptersFailed` when every adapter refused the event.
    async fn publish_to_all(
        &self,
        request: PublishEventRequest,
    ) -> Result<PublishReport, DistributionError>;
}
