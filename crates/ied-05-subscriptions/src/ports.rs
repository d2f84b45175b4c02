//! Ports of the subscription subsystem.

use crate::domain::SubscriptionRecord;
use async_trait::async_trait;
use serde::Serialize;
use shared_types::{AdapterOutcome, DistributionError, Event, SubscribeRequest};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Result of installing a consumer subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionReceipt {
    /// The fresh subscription id.
    pub subscription_id: Uuid,

    /// Human-readable summary.
    pub message: String,

    /// Per-adapter subscription outcome rows.
    pub adapters: Vec<AdapterOutcome>,
}

/// Subscription service - inbound port.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Install a consumer subscription: one adapter subscription per
    /// ledger pointing at the distributor's notification webhook, and
    /// an in-process record for dispatch.
    async fn subscribe(
        &self,
        request: SubscribeRequest,
    ) -> Result<SubscriptionReceipt, DistributionError>;

    /// Dispatch one inbound event to every matching consumer callback,
    /// at most once per global id per engine lifetime.
    async fn handle_consumer_notification(&self, event: Event);

    /// Live consumer subscriptions.
    fn subscriptions(&self) -> Vec<SubscriptionRecord>;

    /// Drop a consumer subscription record. Local only: the adapter
    /// subscriptions keep feeding replication.
    fn remove(&self, id: &Uuid) -> bool;
}

/// Outbound consumer POST failure.
#[derive(Debug, Clone, Error)]
#[error("consumer webhook {url} failed: {reason}")]
pub struct NotifyError {
    /// Callback URL.
    pub url: String,
    /// Failure description.
    pub reason: String,
}

/// Consumer webhook client - outbound port.
#[async_trait]
pub trait ConsumerNotifier: Send + Sync {
    /// POST `event` to `callback_url`.
    async fn notify(&self, callback_url: &str, event: &Event) -> Result<(), NotifyError>;
}

/// reqwest implementation of the consumer notifier.
pub struct HttpConsumerNotifier {
    client: reqwest::Client,
}

impl HttpConsumerNotifier {
    /// Build with the per-call notification timeout.
    pub fn new(timeout: Duration) -> Result<Self, DistributionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| DistributionError::Internal(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ConsumerNotifier for HttpConsumerNotifier {
    async fn notify(&self, callback_url: &str, event: &Event) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(callback_url)
            .json(event)
            .send()
            .await
            .map_err(|e| NotifyError {
                url: callback_url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NotifyError {
                url: callback_url.to_string(),
                reason: format!("status {}", response.status()),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Notifier that records deliveries in memory.
#[derive(Default)]
pub struct MockConsumerNotifier {
    delivered: parking_lot::Mutex<Vec<(String, Event)>>,
    fail: std::sync::atomic::AtomicBool,
}

impl MockConsumerNotifier {
    /// Notifier that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery fail.
    pub fn fail_deliveries(&self) {
        self.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// `(callback url, event)` pairs delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<(String, Event)> {
        self.delivered.lock().clone()
    }

    /// Number of attempted deliveries.
    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().len()
    }
}

#[async_trait]
impl ConsumerNotifier for MockConsumerNotifier {
    async fn notify(&self, callback_url: &str, event: &Event) -> Result<(), NotifyError> {
        self.delivered
            .lock()
            .push((callback_url.to_string(), event.clone()));
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError {
                url: callback_url.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}
