//! End-to-end distribution scenarios.

use crate::harness::{adapter_event, Distributor};
use broker_runtime::container::config::{AdapterConfig, BrokerConfig, Environment};
use broker_runtime::{bootstrap, SubsystemContainer};
use ied_01_event_cache::InMemorySetStore;
use ied_02_adapter_gateway::{AdapterRegistry, LedgerAdapter, MockLedgerAdapter};
use ied_03_publication::PublicationApi;
use ied_04_replication::ReplicationApi;
use ied_05_subscriptions::{MockConsumerNotifier, SubscriptionApi};
use shared_types::{GlobalId, PublishEventRequest, SubscribeRequest};
use std::sync::Arc;
use std::time::Duration;

fn publish_request(hl: &str) -> PublishEventRequest {
    PublishEventRequest {
        event_type: "ProductAdded".to_string(),
        data_location: format!("https://ledger.example/events?hl={hl}"),
        relevant_metadata: vec!["sbx".to_string()],
        entity_id: format!("0x{}", "11".repeat(32)),
        previous_entity_hash: format!("0x{}", "22".repeat(32)),
        iss: None,
        rpc_address: None,
    }
}

fn subscribe_request(types: &[&str]) -> SubscribeRequest {
    SubscribeRequest {
        event_types: types.iter().map(|s| s.to_string()).collect(),
        notification_endpoint: "https://desmos.example/hook".to_string(),
        iss: None,
    }
}

// S1: direct publish with every adapter healthy lands the global id
// on every chain and reports both adapters as successful.
#[tokio::test]
async fn direct_publish_all_adapters_healthy() {
    let dist = Distributor::new(&[("hashnet", "1"), ("alastria", "2")], Duration::ZERO);
    dist.adapter("hashnet").set_ack_timestamp(100);
    dist.adapter("alastria").set_ack_timestamp(200);

    let report = dist
        .publisher
        .publish_to_all(publish_request("0xabc"))
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.accepted(), 2);
    assert!(report.adapters.iter().all(|a| a.success));

    let gid = GlobalId::from("0xabc");
    assert!(dist.cache.is_on_chain("1", &gid).await.unwrap());
    assert!(dist.cache.is_on_chain("2", &gid).await.unwrap());
}

// S2: one adapter down. The publish still succeeds, the failing
// adapter's row carries its error, and only the healthy chain is
// marked.
#[tokio::test]
async fn direct_publish_with_one_adapter_failing() {
    let dist = Distributor::new(&[("hashnet", "1"), ("alastria", "2")], Duration::ZERO);
    dist.adapter("hashnet").fail_publishes("Network timeout");

    let report = dist
        .publisher
        .publish_to_all(publish_request("0xabc"))
        .await
        .unwrap();

    assert!(report.success);
    let hashnet = &report.adapters[0];
    let alastria = &report.adapters[1];
    assert_eq!(hashnet.name, "hashnet");
    assert!(!hashnet.success);
    assert_eq!(hashnet.error.as_deref(), Some("Network timeout"));
    assert!(alastria.success);

    let gid = GlobalId::from("0xabc");
    assert!(!dist.cache.is_on_chain("1", &gid).await.unwrap());
    assert!(dist.cache.is_on_chain("2", &gid).await.unwrap());
}

// S3: the propagation window absorbs the sibling ledger's own arrival
// of the same event; neither pass publishes anything.
#[tokio::test(start_paused = true)]
async fn replication_delay_suppresses_duplicate_publication() {
    let dist = Arc::new(Distributor::new(
        &[("hashnet", "1"), ("alastria", "2")],
        Duration::from_secs(15),
    ));

    // t = 0: hashnet notifies.
    let first = tokio::spawn({
        let dist = Arc::clone(&dist);
        async move {
            dist.replicator
                .handle_incoming(adapter_event("0xaaa", "ProductAdded", "hashnet"), "1")
                .await;
        }
    });

    // t = 5 s: alastria independently carries the same event.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let second = tokio::spawn({
        let dist = Arc::clone(&dist);
        async move {
            dist.replicator
                .handle_incoming(adapter_event("0xaaa", "ProductAdded", "alastria"), "2")
                .await;
        }
    });

    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(dist.adapter("hashnet").publish_calls(), 0);
    assert_eq!(dist.adapter("alastria").publish_calls(), 0);

    let gid = GlobalId::from("0xaaa");
    assert!(dist.cache.is_on_chain("1", &gid).await.unwrap());
    assert!(dist.cache.is_on_chain("2", &gid).await.unwrap());
}

// S4: the consumer hears about a global id exactly once even when the
// notification arrives once per source ledger.
#[tokio::test]
async fn consumer_notification_is_deduplicated() {
    let dist = Distributor::new(&[("hashnet", "1"), ("alastria", "2")], Duration::ZERO);
    dist.subscriptions
        .subscribe(subscribe_request(&["ProductAdded"]))
        .await
        .unwrap();

    dist.subscriptions
        .handle_consumer_notification(adapter_event("0xbbb", "ProductAdded", "hashnet"))
        .await;
    dist.subscriptions
        .handle_consumer_notification(adapter_event("0xbbb", "ProductAdded", "alastria"))
        .await;

    assert_eq!(dist.notifier.delivery_count(), 1);
    let (url, event) = &dist.notifier.delivered()[0];
    assert_eq!(url, "https://desmos.example/hook");
    assert!(event.network.is_none());

    let gid = GlobalId::from("0xbbb");
    assert!(dist.cache.is_notified(&gid).await.unwrap());
}

// S5: bootstrap installs exactly one wildcard subscription per
// adapter, callback path keyed by adapter name.
#[tokio::test]
async fn bootstrap_installs_wildcard_subscription_per_adapter() {
    let mocks = vec![
        Arc::new(MockLedgerAdapter::new("hashnet", "1")),
        Arc::new(MockLedgerAdapter::new("alastria", "2")),
    ];
    let handles: Vec<Arc<dyn LedgerAdapter>> = mocks
        .iter()
        .map(|a| Arc::clone(a) as Arc<dyn LedgerAdapter>)
        .collect();
    let config = BrokerConfig {
        base_url: "http://ied.example:8080".to_string(),
        environment: Environment::Test,
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
    };
    let container = SubsystemContainer::assemble(
        config,
        Arc::new(InMemorySetStore::new()),
        Arc::new(AdapterRegistry::new(handles).unwrap()),
        Arc::new(MockConsumerNotifier::new()),
    )
    .unwrap();

    let report = bootstrap::run(&container).await.unwrap();
    assert_eq!(report.internal_subscriptions, 2);

    for mock in &mocks {
        let installed = mock.subscriptions();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].event_types, vec!["*".to_string()]);
        assert_eq!(
            installed[0].notification_endpoint,
            format!(
                "http://ied.example:8080/internal/eventNotification/{}",
                mock.name()
            )
        );

        // The diagnostic listing sees the same installation.
        let listed = mock.list_subscriptions().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["eventTypes"][0], "*");
    }
}

// S6: once replication has covered every ledger, a late re-entrant
// notification changes nothing.
#[tokio::test]
async fn re_entrant_notification_leaves_cache_unchanged() {
    let dist = Distributor::new(&[("hashnet", "1"), ("alastria", "2")], Duration::ZERO);

    // hashnet notification replicates to alastria.
    dist.replicator
        .handle_incoming(adapter_event("0xccc", "ProductAdded", "hashnet"), "1")
        .await;
    assert_eq!(dist.adapter("alastria").publish_calls(), 1);

    let chains = vec!["1".to_string(), "2".to_string()];
    let before = dist.cache.stats(&chains).await.unwrap();

    // The replicated event comes back from alastria's stream.
    dist.replicator
        .handle_incoming(adapter_event("0xccc", "ProductAdded", "alastria"), "2")
        .await;

    let after = dist.cache.stats(&chains).await.unwrap();
    assert_eq!(before.published_per_chain, after.published_per_chain);
    assert_eq!(dist.adapter("alastria").publish_calls(), 1);
    assert_eq!(dist.adapter("hashnet").publish_calls(), 0);
}

// Repeated notifications of one event produce at most one publish per
// target chain.
#[tokio::test]
async fn repeated_incoming_notifications_publish_once_per_target() {
    let dist = Distributor::new(
        &[("hashnet", "1"), ("alastria", "2"), ("besu", "3")],
        Duration::ZERO,
    );

    for _ in 0..5 {
        dist.replicator
            .handle_incoming(adapter_event("0xddd", "ProductAdded", "hashnet"), "1")
            .await;
    }

    assert_eq!(dist.adapter("alastria").publish_calls(), 1);
    assert_eq!(dist.adapter("besu").publish_calls(), 1);
    assert_eq!(dist.adapter("hashnet").publish_calls(), 0);
}

// Two identical subscriptions are independent: both ids live, both
// callbacks receive the event.
#[tokio::test]
async fn duplicate_subscriptions_both_receive() {
    let dist = Distributor::new(&[("hashnet", "1")], Duration::ZERO);

    let first = dist
        .subscriptions
        .subscribe(subscribe_request(&["ProductAdded"]))
        .await
        .unwrap();
    let second = dist
        .subscriptions
        .subscribe(subscribe_request(&["ProductAdded"]))
        .await
        .unwrap();
    assert_ne!(first.subscription_id, second.subscription_id);

    dist.subscriptions
        .handle_consumer_notification(adapter_event("0xeee", "ProductAdded", "hashnet"))
        .await;

    assert_eq!(dist.notifier.delivery_count(), 2);
}

// Publication followed by the adapters' own notifications converges
// without extra traffic: the full cycle of the distributor.
#[tokio::test]
async fn publish_then_notification_cycle_terminates() {
    let dist = Distributor::new(&[("hashnet", "1"), ("alastria", "2")], Duration::ZERO);

    let report = dist
        .publisher
        .publish_to_all(publish_request("0xfed"))
        .await
        .unwrap();
    assert_eq!(report.accepted(), 2);
    let direct_calls = (
        dist.adapter("hashnet").publish_calls(),
        dist.adapter("alastria").publish_calls(),
    );

    // Each ledger now notifies the engine about the event it carries.
    dist.replicator
        .handle_incoming(adapter_event("0xfed", "ProductAdded", "hashnet"), "1")
        .await;
    dist.replicator
        .handle_incoming(adapter_event("0xfed", "ProductAdded", "alastria"), "2")
        .await;

    // No republication: set membership terminates the cycle.
    assert_eq!(
        (
            dist.adapter("hashnet").publish_calls(),
            dist.adapter("alastria").publish_calls(),
        ),
        direct_calls
    );
}
