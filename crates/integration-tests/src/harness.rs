//! Mock-wired distributor harness.
//!
//! Assembles the real subsystem services over scripted adapters, the
//! in-memory set store, and a recording consumer notifier, so the
//! scenarios exercise the genuine engine logic end to end.

use ied_01_event_cache::{CrossLedgerCache, InMemorySetStore};
use ied_02_adapter_gateway::{AdapterRegistry, LedgerAdapter, MockLedgerAdapter};
use ied_03_publication::PublisherService;
use ied_04_replication::ReplicatorService;
use ied_05_subscriptions::{ConsumerNotifier, MockConsumerNotifier, SubscriptionService};
use shared_types::Event;
use std::sync::Arc;
use std::time::Duration;

/// The assembled engine plus handles to its scripted collaborators.
pub struct Distributor {
    pub adapters: Vec<Arc<MockLedgerAdapter>>,
    pub registry: Arc<AdapterRegistry>,
    pub cache: Arc<CrossLedgerCache>,
    pub publisher: Arc<PublisherService>,
    pub replicator: Arc<ReplicatorService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub notifier: Arc<MockConsumerNotifier>,
}

impl Distributor {
    /// Engine over `(name, chain id)` adapters with the given
    /// replication delay.
    pub fn new(adapters: &[(&str, &str)], replication_delay: Duration) -> Self {
        let mocks: Vec<Arc<MockLedgerAdapter>> = adapters
            .iter()
            .map(|(name, chain)| Arc::new(MockLedgerAdapter::new(*name, *chain)))
            .collect();
        let handles: Vec<Arc<dyn LedgerAdapter>> = mocks
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn LedgerAdapter>)
            .collect();

        let registry = Arc::new(AdapterRegistry::new(handles).expect("adapters configured"));
        let cache = Arc::new(CrossLedgerCache::new(Arc::new(InMemorySetStore::new())));
        let notifier = Arc::new(MockConsumerNotifier::new());

        let publisher = Arc::new(PublisherService::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
        ));
        let replicator = Arc::new(ReplicatorService::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            replication_delay,
        ));
        let subscriptions = Arc::new(SubscriptionService::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            Arc::clone(&notifier) as Arc<dyn ConsumerNotifier>,
            "http://distributor:8080/internal/desmosNotification".to_string(),
            vec!["sbx".to_string()],
        ));

        Self {
            adapters: mocks,
            registry,
            cache,
            publisher,
            replicator,
            subscriptions,
            notifier,
        }
    }

    /// Adapter handle by name.
    pub fn adapter(&self, name: &str) -> &Arc<MockLedgerAdapter> {
        self.adapters
            .iter()
            .find(|a| a.name() == name)
            .expect("adapter exists")
    }
}

/// An event as an adapter would notify it, `network` marker included.
pub fn adapter_event(hl: &str, event_type: &str, network: &str) -> Event {
    Event {
        id: 1,
        timestamp: 1_700_000_000_000,
        event_type: event_type.to_string(),
        data_location: format!("https://ledger.example/events?hl={hl}"),
        entity_id_hash: format!("0x{}", "11".repeat(32)),
        previous_entity_hash: format!("0x{}", "22".repeat(32)),
        relevant_metadata: vec!["sbx".to_string()],
        publisher_address: None,
        author_address: None,
        network: Some(network.to_string()),
    }
}
