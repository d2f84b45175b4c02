//! Subsystem construction and wiring.

use crate::container::config::BrokerConfig;
use ied_01_event_cache::{CrossLedgerCache, InMemorySetStore, SetStore};
use ied_02_adapter_gateway::{
    AdapterDescriptor, AdapterRegistry, HttpAdapterClient, LedgerAdapter, RetryPolicy,
};
use ied_03_publication::PublisherService;
use ied_04_replication::ReplicatorService;
use ied_05_subscriptions::{ConsumerNotifier, HttpConsumerNotifier, SubscriptionService};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Container construction failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("adapter registry: {0}")]
    Registry(#[from] ied_02_adapter_gateway::RegistryError),

    #[error("http client: {0}")]
    Client(String),
}

/// All engine subsystems, constructed once at startup.
///
/// Handlers receive these as cloned `Arc` handles; nothing here is
/// reachable through a global.
pub struct SubsystemContainer {
    pub config: BrokerConfig,
    pub cache: Arc<CrossLedgerCache>,
    pub registry: Arc<AdapterRegistry>,
    pub publisher: Arc<PublisherService>,
    pub replicator: Arc<ReplicatorService>,
    pub subscriptions: Arc<SubscriptionService>,
    pub started_at: Instant,
}

impl SubsystemContainer {
    /// Build the engine over HTTP adapter clients and the bundled
    /// in-memory store.
    pub fn build(config: BrokerConfig) -> Result<Self, ContainerError> {
        let store: Arc<dyn SetStore> = Arc::new(InMemorySetStore::new());
        Self::build_with_store(config, store)
    }

    /// Build with an externally supplied store (the Redis-backed swap
    /// point, and the seam tests use).
    pub fn build_with_store(
        config: BrokerConfig,
        store: Arc<dyn SetStore>,
    ) -> Result<Self, ContainerError> {
        let retry = RetryPolicy {
            max_attempts: config.max_retry_attempts,
            retry_delay: config.retry_delay,
        };

        let mut adapters: Vec<Arc<dyn LedgerAdapter>> = Vec::with_capacity(config.adapters.len());
        for adapter_config in &config.adapters {
            let descriptor = AdapterDescriptor::new(
                adapter_config.name.clone(),
                adapter_config.url.clone(),
                adapter_config.chain_id.clone(),
            );
            let client =
                HttpAdapterClient::new(descriptor, config.adapter_timeout, retry.clone())
                    .map_err(|e| ContainerError::Client(e.to_string()))?;
            adapters.push(Arc::new(client));
        }

        let registry = Arc::new(AdapterRegistry::new(adapters)?);
        let notifier: Arc<dyn ConsumerNotifier> = Arc::new(
            HttpConsumerNotifier::new(config.notification_timeout)
                .map_err(|e| ContainerError::Client(e.to_string()))?,
        );

        Self::assemble(config, store, registry, notifier)
    }

    /// Final wiring step, shared with tests that inject mock adapters
    /// and notifiers.
    pub fn assemble(
        config: BrokerConfig,
        store: Arc<dyn SetStore>,
        registry: Arc<AdapterRegistry>,
        notifier: Arc<dyn ConsumerNotifier>,
    ) -> Result<Self, ContainerError> {
        let cache = Arc::new(CrossLedgerCache::new(store));

        let publisher = Arc::new(PublisherService::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
        ));
        let replicator = Arc::new(ReplicatorService::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            config.replication_delay,
        ));
        let subscriptions = Arc::new(SubscriptionService::new(
            Arc::clone(&registry),
            Arc::clone(&cache),
            notifier,
            config.consumer_notification_url(),
            config.internal_subscription_metadata.clone(),
        ));

        info!(
            adapters = registry.len(),
            replication_delay_ms = config.replication_delay.as_millis() as u64,
            "Subsystem container assembled"
        );

        Ok(Self {
            config,
            cache,
            registry,
            publisher,
            replicator,
            subscriptions,
            started_at: Instant::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::config::AdapterConfig;
    use ied_02_adapter_gateway::MockLedgerAdapter;
    use ied_05_subscriptions::MockConsumerNotifier;

    fn config() -> BrokerConfig {
        BrokerConfig {
            adapters: vec![
                AdapterConfig {
                    name: "hashnet".to_string(),
                    url: "http://hashnet:8080".to_string(),
                    chain_id: Some("1".to_string()),
                },
                AdapterConfig {
                    name: "alastria".to_string(),
                    url: "http://alastria:8080".to_string(),
                    chain_id: Some("2".to_string()),
                },
            ],
            ..BrokerConfig::default()
        }
    }

    #[test]
    fn test_build_wires_every_subsystem() {
        let container = SubsystemContainer::build(config()).unwrap();
        assert_eq!(container.registry.len(), 2);
        assert_eq!(
            container.registry.chain_ids(),
            vec!["1".to_string(), "2".to_string()]
        );
    }

    #[test]
    fn test_build_rejects_empty_adapter_set() {
        let config = BrokerConfig::default();
        assert!(matches!(
            SubsystemContainer::build(config),
            Err(ContainerError::Registry(_))
        ));
    }

    #[test]
    fn test_assemble_accepts_mock_ports() {
        let registry = Arc::new(
            AdapterRegistry::new(vec![
                Arc::new(MockLedgerAdapter::new("hashnet", "1")) as Arc<dyn LedgerAdapter>
            ])
            .unwrap(),
        );
        let container = SubsystemContainer::assemble(
            config(),
            Arc::new(InMemorySetStore::new()),
            registry,
            Arc::new(MockConsumerNotifier::new()),
        )
        .unwrap();
        assert_eq!(container.registry.len(), 1);
    }
}
