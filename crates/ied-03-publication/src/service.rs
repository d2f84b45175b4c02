//! Publisher service implementation.

use crate::ports::{PublicationApi, PublishReport};
use async_trait::async_trait;
use futures::future::join_all;
use ied_01_event_cache::CrossLedgerCache;
use ied_02_adapter_gateway::{AdapterPublishRequest, AdapterRegistry, LedgerAdapter};
use shared_types::{
    extract_global_id, AdapterOutcome, DistributionError, GlobalId, PublishEventRequest,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Fan-out publisher over the adapter registry and the cross-ledger
/// cache.
pub struct PublisherService {
    registry: Arc<AdapterRegistry>,
    cache: Arc<CrossLedgerCache>,
}

impl PublisherService {
    pub fn new(registry: Arc<AdapterRegistry>, cache: Arc<CrossLedgerCache>) -> Self {
        Self { registry, cache }
    }

    /// Publish to one adapter and mark the cache on acceptance.
    ///
    /// A cache failure after a successful adapter call is logged but
    /// does not downgrade the row: the ledger has the event, and the
    /// next replication observation heals the cache.
    async fn publish_one(
        &self,
        adapter: Arc<dyn LedgerAdapter>,
        body: AdapterPublishRequest,
        global_id: &GlobalId,
    ) -> AdapterOutcome {
        match adapter.publish(body).await {
            Ok(ack) => {
                if let Err(e) = self.cache.mark_published(adapter.chain_id(), global_id).await {
                    warn!(
                        adapter = %adapter.name(),
                        chain = %adapter.chain_id(),
                        global_id = %global_id,
                        error = %e,
                        "Publication accepted but cache marking failed"
                    );
                }
                AdapterOutcome::ok(adapter.name(), ack.timestamp)
            }
            Err(err) => AdapterOutcome::failed(adapter.name(), err.to_string()),
        }
    }
}

#[async_trait]
impl PublicationApi for PublisherService {
    async fn publish_to_all(
        &self,
        request: PublishEventRequest,
    ) -> Result<PublishReport, DistributionError> {
        let global_id = extract_global_id(&request.data_location)?;

        // Same body to every adapter, identical to the consumer's
        // request fields.
        let body = AdapterPublishRequest {
            event_type: request.event_type.clone(),
            data_location: request.data_location.clone(),
            relevant_metadata: request.relevant_metadata.clone(),
            entity_id: request.entity_id.clone(),
            previous_entity_hash: request.previous_entity_hash.clone(),
        };

        let adapters = self.registry.snapshot();
        let calls = adapters
            .into_iter()
            .map(|adapter| self.publish_one(adapter, body.clone(), &global_id));

        // Await every adapter; a failure on one must not short-circuit
        // the others.
        let adapters = join_all(calls).await;

        let accepted = adapters.iter().filter(|a| a.success).count();
        let timestamp = adapters.iter().find_map(|a| a.timestamp);

        info!(
            global_id = %global_id,
            event_type = %request.event_type,
            accepted,
            total = adapters.len(),
            "Publication fan-out finished"
        );

        Ok(PublishReport {
            success: accepted > 0,
            timestamp,
            adapters,
        })
    }
}
