//! Replicator service implementation.
//!
//! Per-event flow: observe → wait → check missing → dispatch. The
//! states live only in the handler's execution; nothing is persisted
//! beyond the cache sets, and an engine shut down mid-wait simply
//! abandons the pass (the next notification from any ledger resumes
//! the repair).

use crate::ports::ReplicationApi;
use async_trait::async_trait;
use futures::future::join_all;
use ied_01_event_cache::CrossLedgerCache;
use ied_02_adapter_gateway::{AdapterPublishRequest, AdapterRegistry, LedgerAdapter};
use shared_types::{extract_global_id, Event, GlobalId};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Replicator over the adapter registry and the cross-ledger cache.
pub struct ReplicatorService {
    registry: Arc<AdapterRegistry>,
    cache: Arc<CrossLedgerCache>,
    replication_delay: Duration,
}

impl ReplicatorService {
    pub fn new(
        registry: Arc<AdapterRegistry>,
        cache: Arc<CrossLedgerCache>,
        replication_delay: Duration,
    ) -> Self {
        Self {
            registry,
            cache,
            replication_delay,
        }
    }

    /// Build the outbound publish body from an inbound event. The
    /// transport-only `network` marker is dropped here; the data
    /// location is carried byte-for-byte.
    fn publish_body(event: &Event) -> AdapterPublishRequest {
        let event = event.without_network();
        AdapterPublishRequest {
            event_type: event.event_type,
            data_location: event.data_location,
            relevant_metadata: event.relevant_metadata,
            entity_id: event.entity_id_hash,
            previous_entity_hash: event.previous_entity_hash,
        }
    }

    /// Publish to one missing ledger and record success in the cache.
    /// Failures are logged and abandoned; the next inbound
    /// notification observes the still-missing chain and retries.
    async fn replicate_one(
        &self,
        adapter: Arc<dyn LedgerAdapter>,
        body: AdapterPublishRequest,
        global_id: &GlobalId,
    ) {
        match adapter.publish(body).await {
            Ok(_) => {
                info!(
                    adapter = %adapter.name(),
                    chain = %adapter.chain_id(),
                    global_id = %global_id,
                    "Replicated event"
                );
                if let Err(e) = self.cache.mark_published(adapter.chain_id(), global_id).await {
                    warn!(
                        chain = %adapter.chain_id(),
                        global_id = %global_id,
                        error = %e,
                        "Replication succeeded but cache marking failed"
                    );
                }
            }
            Err(err) => {
                warn!(
                    adapter = %adapter.name(),
                    global_id = %global_id,
                    error = %err,
                    "Replication to adapter failed; will be retried on next observation"
                );
            }
        }
    }
}

#[async_trait]
impl ReplicationApi for ReplicatorService {
    async fn handle_incoming(&self, event: Event, source_chain: &str) {
        let global_id = match extract_global_id(&event.data_location) {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    source_chain,
                    data_location = %event.data_location,
                    error = %e,
                    "Dropping notification without global id"
                );
                return;
            }
        };

        // Record the observation before waiting, so concurrent passes
        // for the same event see this chain as covered.
        if let Err(e) = self.cache.mark_published(source_chain, &global_id).await {
            warn!(
                source_chain,
                global_id = %global_id,
                error = %e,
                "Could not record observation; aborting replication pass"
            );
            return;
        }

        // Propagation-delay gate. One timer per invocation.
        if !self.replication_delay.is_zero() {
            debug!(
                global_id = %global_id,
                delay_ms = self.replication_delay.as_millis() as u64,
                "Waiting out the propagation window"
            );
            sleep(self.replication_delay).await;
        }

        let target_chains: Vec<String> = self
            .registry
            .chain_ids()
            .into_iter()
            .filter(|chain| chain != source_chain)
            .collect();

        let missing = match self.cache.missing_chains(&global_id, &target_chains).await {
            Ok(missing) => missing,
            Err(e) => {
                warn!(
                    global_id = %global_id,
                    error = %e,
                    "Missing-chain computation failed; aborting replication pass"
                );
                return;
            }
        };

        if missing.is_empty() {
            info!(
                global_id = %global_id,
                source_chain,
                "Every ledger already carries the event; nothing to replicate"
            );
            return;
        }

        let body = Self::publish_body(&event);
        let targets: Vec<Arc<dyn LedgerAdapter>> = self
            .registry
            .iter()
            .filter(|a| missing.iter().any(|chain| chain == a.chain_id()))
            .map(Arc::clone)
            .collect();

        info!(
            global_id = %global_id,
            source_chain,
            targets = ?missing,
            "Replicating to missing ledgers"
        );

        join_all(
            targets
                .into_iter()
                .map(|adapter| self.replicate_one(adapter, body.clone(), &global_id)),
        )
        .await;
    }
}
