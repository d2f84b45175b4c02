//! # Ledger Adapter Port
//!
//! Outbound port for one ledger adapter, plus the request envelopes
//! the engine sends across it. Neither envelope has a `network` field;
//! outbound bodies are network-free by construction.

use crate::domain::AdapterError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Publish body sent to an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterPublishRequest {
    /// Logical channel.
    pub event_type: String,

    /// Payload URL, carried byte-for-byte from the inbound request so
    /// the embedded global id survives untouched.
    pub data_location: String,

    /// Categorical tags.
    #[serde(default)]
    pub relevant_metadata: Vec<String>,

    /// 32-byte entity identifier, `0x`-prefixed hex.
    pub entity_id: String,

    /// Previous entity version hash, same encoding.
    pub previous_entity_hash: String,
}

/// Subscription body sent to an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterSubscribeRequest {
    /// Event types to deliver; `"*"` for all.
    pub event_types: Vec<String>,

    /// Callback the adapter notifies; always a distributor URL, never
    /// the consumer's.
    pub notification_endpoint: String,

    /// Environment tags forwarded with the subscription.
    #[serde(default)]
    pub metadata: Vec<String>,
}

/// Acknowledgement of an accepted publication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishAck {
    /// Adapter-assigned timestamp, when the adapter reports one.
    #[serde(default)]
    pub timestamp: Option<u64>,
}

/// One ledger adapter - outbound port.
#[async_trait]
pub trait LedgerAdapter: Send + Sync {
    /// Adapter name (unique, stable).
    fn name(&self) -> &str;

    /// Ledger chain id (the cache key suffix).
    fn chain_id(&self) -> &str;

    /// `true` when the adapter answers its health endpoint with
    /// HTTP 200 and `status == "UP"`.
    async fn health_check(&self) -> bool;

    /// Publish an event to this ledger. Retried per the client's
    /// policy before a terminal error is returned.
    async fn publish(&self, request: AdapterPublishRequest) -> Result<PublishAck, AdapterError>;

    /// Install a subscription on this ledger.
    async fn subscribe(&self, request: AdapterSubscribeRequest) -> Result<(), AdapterError>;

    /// List the subscriptions the adapter currently holds. Diagnostic.
    async fn list_subscriptions(&self) -> Result<Vec<serde_json::Value>, AdapterError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Scripted in-memory adapter used across the subsystem tests.
pub struct MockLedgerAdapter {
    name: String,
    chain_id: String,
    healthy: std::sync::atomic::AtomicBool,
    publish_failure: parking_lot::Mutex<Option<String>>,
    ack_timestamp: std::sync::atomic::AtomicU64,
    published: parking_lot::Mutex<Vec<AdapterPublishRequest>>,
    subscribed: parking_lot::Mutex<Vec<AdapterSubscribeRequest>>,
}

impl MockLedgerAdapter {
    /// Healthy adapter that accepts everything.
    #[must_use]
    pub fn new(name: impl Into<String>, chain_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_id: chain_id.into(),
            healthy: std::sync::atomic::AtomicBool::new(true),
            publish_failure: parking_lot::Mutex::new(None),
            ack_timestamp: std::sync::atomic::AtomicU64::new(1_000),
            published: parking_lot::Mutex::new(Vec::new()),
            subscribed: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Make every publish fail with `reason` (retry budget already
    /// spent, as the real client would report it).
    pub fn fail_publishes(&self, reason: impl Into<String>) {
        *self.publish_failure.lock() = Some(reason.into());
    }

    /// Restore publish success.
    pub fn heal_publishes(&self) {
        *self.publish_failure.lock() = None;
    }

    /// Set the health probe answer.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy
            .store(healthy, std::sync::atomic::Ordering::SeqCst);
    }

    /// Set the timestamp returned on accepted publications.
    pub fn set_ack_timestamp(&self, timestamp: u64) {
        self.ack_timestamp
            .store(timestamp, std::sync::atomic::Ordering::SeqCst);
    }

    /// Publish bodies accepted so far.
    #[must_use]
    pub fn published(&self) -> Vec<AdapterPublishRequest> {
        self.published.lock().clone()
    }

    /// Number of publish calls that reached this adapter, including
    /// rejected ones.
    #[must_use]
    pub fn publish_calls(&self) -> usize {
        self.published.lock().len()
    }

    /// Subscription bodies accepted so far.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<AdapterSubscribeRequest> {
        self.subscribed.lock().clone()
    }
}

#[async_trait]
impl LedgerAdapter for MockLedgerAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(std::sync::atomic::Ordering::SeqCst)
    }

    async fn publish(&self, request: AdapterPublishRequest) -> Result<PublishAck, AdapterError> {
        self.published.lock().push(request);
        if let Some(reason) = self.publish_failure.lock().clone() {
            return Err(AdapterError::Unavailable {
                adapter: self.name.clone(),
                reason,
            });
        }
        Ok(PublishAck {
            timestamp: Some(self.ack_timestamp.load(std::sync::atomic::Ordering::SeqCst)),
        })
    }

    async fn subscribe(&self, request: AdapterSubscribeRequest) -> Result<(), AdapterError> {
        if !self.healthy.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AdapterError::Unavailable {
                adapter: self.name.clone(),
                reason: "adapter down".to_string(),
            });
        }
        self.subscribed.lock().push(request);
        Ok(())
    }

    async fn list_subscriptions(&self) -> Result<Vec<serde_json::Value>, AdapterError> {
        Ok(self
            .subscribed
            .lock()
            .iter()
            .map(|s| serde_json::to_value(s).unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publish_request() -> AdapterPublishRequest {
        AdapterPublishRequest {
            event_type: "ProductAdded".to_string(),
            data_location: "https://ledger.example/events?hl=0xabc".to_string(),
            relevant_metadata: vec![],
            entity_id: format!("0x{}", "11".repeat(32)),
            previous_entity_hash: format!("0x{}", "22".repeat(32)),
        }
    }

    #[tokio::test]
    async fn test_mock_records_publishes() {
        let adapter = MockLedgerAdapter::new("hashnet", "1");
        adapter.set_ack_timestamp(42);
        let ack = adapter.publish(publish_request()).await.unwrap();
        assert_eq!(ack.timestamp, Some(42));
        assert_eq!(adapter.publish_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let adapter = MockLedgerAdapter::new("hashnet", "1");
        adapter.fail_publishes("Network timeout");
        let err = adapter.publish(publish_request()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Network timeout");
    }

    #[tokio::test]
    async fn test_publish_body_has_no_network_field() {
        let json = serde_json::to_value(publish_request()).unwrap();
        assert!(json.get("network").is_none());
        assert_eq!(json["dataLocation"], "https://ledger.example/events?hl=0xabc");
    }
}
