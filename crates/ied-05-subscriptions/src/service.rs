//! Subscription service implementation.

use crate::domain::SubscriptionRecord;
use crate::ports::{ConsumerNotifier, SubscriptionApi, SubscriptionReceipt};
use crate::registry::SubscriptionStore;
use async_trait::async_trait;
use futures::future::join_all;
use ied_01_event_cache::CrossLedgerCache;
use ied_02_adapter_gateway::{AdapterRegistry, AdapterSubscribeRequest, LedgerAdapter};
use shared_types::{
    extract_global_id, AdapterOutcome, DistributionError, Event, SubscribeRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Consumer subscription service.
pub struct SubscriptionService {
    registry: Arc<AdapterRegistry>,
    cache: Arc<CrossLedgerCache>,
    store: SubscriptionStore,
    notifier: Arc<dyn ConsumerNotifier>,
    /// The distributor's own consumer-notification webhook; every
    /// adapter subscription points here, never at the consumer.
    own_callback_url: String,
    /// Environment tags forwarded on adapter subscriptions.
    subscription_metadata: Vec<String>,
}

impl SubscriptionService {
    pub fn new(
        registry: Arc<AdapterRegistry>,
        cache: Arc<CrossLedgerCache>,
        notifier: Arc<dyn ConsumerNotifier>,
        own_callback_url: String,
        subscription_metadata: Vec<String>,
    ) -> Self {
        Self {
            registry,
            cache,
            store: SubscriptionStore::new(),
            notifier,
            own_callback_url,
            subscription_metadata,
        }
    }

    /// Install the adapter-side subscription on one ledger.
    async fn subscribe_one(
        &self,
        adapter: Arc<dyn LedgerAdapter>,
        body: AdapterSubscribeRequest,
    ) -> AdapterOutcome {
        match adapter.subscribe(body).await {
            Ok(()) => AdapterOutcome::ok(adapter.name(), None),
            Err(err) => AdapterOutcome::failed(adapter.name(), err.to_string()),
        }
    }
}

#[async_trait]
impl SubscriptionApi for SubscriptionService {
    async fn subscribe(
        &self,
        request: SubscribeRequest,
    ) -> Result<SubscriptionReceipt, DistributionError> {
        let record = SubscriptionRecord::new(
            request.event_types.clone(),
            request.notification_endpoint.clone(),
        );
        let subscription_id = record.id;
        self.store.insert(record);

        let body = AdapterSubscribeRequest {
            event_types: request.event_types.clone(),
            notification_endpoint: self.own_callback_url.clone(),
            metadata: self.subscription_metadata.clone(),
        };

        let calls = self
            .registry
            .snapshot()
            .into_iter()
            .map(|adapter| self.subscribe_one(adapter, body.clone()));
        let adapters = join_all(calls).await;

        let accepted = adapters.iter().filter(|a| a.success).count();
        if accepted == 0 {
            // No ledger will feed this subscription; drop the record.
            self.store.remove(&subscription_id);
            warn!(
                subscription = %subscription_id,
                "Every adapter refused the subscription; record dropped"
            );
            return Err(DistributionError::AllAdaptersFailed);
        }

        info!(
            subscription = %subscription_id,
            event_types = ?request.event_types,
            accepted,
            total = adapters.len(),
            "Consumer subscription installed"
        );

        Ok(SubscriptionReceipt {
            subscription_id,
            message: format!(
                "subscription installed on {accepted} of {} adapters",
                adapters.len()
            ),
            adapters,
        })
    }

    async fn handle_consumer_notification(&self, event: Event) {
        let global_id = match extract_global_id(&event.data_location) {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    data_location = %event.data_location,
                    error = %e,
                    "Dropping consumer notification without global id"
                );
                return;
            }
        };

        // Deduplication gate: one notification per global id, ever.
        match self.cache.is_notified(&global_id).await {
            Ok(true) => {
                debug!(global_id = %global_id, "Consumer already notified; suppressing");
                return;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(
                    global_id = %global_id,
                    error = %e,
                    "Notified-gate check failed; aborting dispatch"
                );
                return;
            }
        }

        let matching = self.store.matching(&event.event_type);
        if matching.is_empty() {
            debug!(
                event_type = %event.event_type,
                global_id = %global_id,
                "No subscription covers this event"
            );
            return;
        }

        let outbound = event.without_network();
        let posts = matching.iter().map(|record| {
            let outbound = &outbound;
            let callback = record.callback_url.clone();
            async move {
                if let Err(e) = self.notifier.notify(&callback, outbound).await {
                    warn!(error = %e, "Consumer delivery failed; not retried");
                }
            }
        });

        // Every POST settles before the id is marked; failures do not
        // hold the mark back. At-most-once, not exactly-once.
        join_all(posts).await;

        if let Err(e) = self.cache.mark_notified(&global_id).await {
            warn!(
                global_id = %global_id,
                error = %e,
                "Dispatch finished but notified marking failed"
            );
            return;
        }

        info!(
            global_id = %global_id,
            callbacks = matching.len(),
            "Consumer notified"
        );
    }

    fn subscriptions(&self) -> Vec<SubscriptionRecord> {
        self.store.all()
    }

    fn remove(&self, id: &Uuid) -> bool {
        let removed = self.store.remove(id);
        if removed {
            info!(subscription = %id, "Consumer subscription removed");
        }
        removed
    }
}
