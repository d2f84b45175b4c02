//! reqwest-backed adapter client.
//!
//! One client per adapter; the reqwest `Client` holds the connection
//! pool and enforces the per-attempt timeout. The retry wrapper adds
//! linear backoff on retryable failures and stops immediately on
//! terminal ones.

use crate::domain::{AdapterDescriptor, AdapterError, RetryPolicy};
use crate::ports::{
    AdapterPublishRequest, AdapterSubscribeRequest, LedgerAdapter, PublishAck,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Health endpoint body.
#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// HTTP client for one ledger adapter.
pub struct HttpAdapterClient {
    descriptor: AdapterDescriptor,
    client: Client,
    retry: RetryPolicy,
}

impl HttpAdapterClient {
    /// Build a client with its own pool and per-attempt timeout.
    pub fn new(
        descriptor: AdapterDescriptor,
        attempt_timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(attempt_timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| AdapterError::Unavailable {
                adapter: descriptor.name.clone(),
                reason: format!("client construction failed: {e}"),
            })?;

        Ok(Self {
            descriptor,
            client,
            retry,
        })
    }

    /// Run `operation` under the retry budget. Terminal errors and
    /// successes end the loop; retryable errors wait the linear
    /// backoff and try again.
    async fn with_retry<T, F, Fut>(&self, what: &str, operation: F) -> Result<T, AdapterError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, AdapterError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && !self.retry.is_final(attempt) => {
                    let backoff = self.retry.backoff(attempt);
                    warn!(
                        adapter = %self.descriptor.name,
                        operation = what,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Adapter call failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        adapter = %self.descriptor.name,
                        operation = what,
                        attempt,
                        error = %err,
                        "Adapter call failed terminally"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> AdapterError {
        let reason = if err.is_timeout() {
            "Network timeout".to_string()
        } else if err.is_connect() {
            format!("Cannot connect to {}", self.descriptor.base_url)
        } else {
            err.to_string()
        };
        AdapterError::Unavailable {
            adapter: self.descriptor.name.clone(),
            reason,
        }
    }

    /// Map a non-2xx status to the retryable/terminal split.
    async fn status_error(&self, status: StatusCode, response: reqwest::Response) -> AdapterError {
        let body = response.text().await.unwrap_or_default();
        let reason = if body.is_empty() {
            status.to_string()
        } else {
            body
        };
        if status.is_client_error() {
            AdapterError::Rejected {
                adapter: self.descriptor.name.clone(),
                status: status.as_u16(),
                reason,
            }
        } else {
            AdapterError::Unavailable {
                adapter: self.descriptor.name.clone(),
                reason: format!("status {status}: {reason}"),
            }
        }
    }
}

#[async_trait]
impl LedgerAdapter for HttpAdapterClient {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn chain_id(&self) -> &str {
        &self.descriptor.chain_id
    }

    async fn health_check(&self) -> bool {
        let response = match self.client.get(self.descriptor.health_url()).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(adapter = %self.descriptor.name, error = %e, "Health probe failed");
                return false;
            }
        };
        if response.status() != StatusCode::OK {
            return false;
        }
        match response.json::<HealthBody>().await {
            Ok(body) => body.status == "UP",
            Err(_) => false,
        }
    }

    async fn publish(&self, request: AdapterPublishRequest) -> Result<PublishAck, AdapterError> {
        self.with_retry("publish", || {
            let request = request.clone();
            async move {
                let response = self
                    .client
                    .post(self.descriptor.publish_url())
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(self.status_error(status, response).await);
                }

                response
                    .json::<PublishAck>()
                    .await
                    .map_err(|e| AdapterError::InvalidResponse {
                        adapter: self.descriptor.name.clone(),
                        reason: e.to_string(),
                    })
            }
        })
        .await
    }

    async fn subscribe(&self, request: AdapterSubscribeRequest) -> Result<(), AdapterError> {
        self.with_retry("subscribe", || {
            let request = request.clone();
            async move {
                let response = self
                    .client
                    .post(self.descriptor.subscribe_url())
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(self.status_error(status, response).await);
                }
                Ok(())
            }
        })
        .await
    }

    async fn list_subscriptions(&self) -> Result<Vec<serde_json::Value>, AdapterError> {
        let response = self
            .client
            .get(self.descriptor.subscribe_url())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error(status, response).await);
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| AdapterError::InvalidResponse {
                adapter: self.descriptor.name.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(retry: RetryPolicy) -> HttpAdapterClient {
        let descriptor =
            AdapterDescriptor::new("hashnet", "http://127.0.0.1:1", Some("1".to_string()));
        HttpAdapterClient::new(descriptor, Duration::from_millis(200), retry).unwrap()
    }

    #[tokio::test]
    async fn test_retry_stops_on_terminal_error() {
        let client = client(RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
        });
        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<(), AdapterError> = client
            .with_retry("op", || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async {
                    Err(AdapterError::Rejected {
                        adapter: "hashnet".into(),
                        status: 400,
                        reason: "bad".into(),
                    })
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_exhausts_budget_on_retryable_error() {
        let client = client(RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
        });
        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<(), AdapterError> = client
            .with_retry("op", || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async {
                    Err(AdapterError::Unavailable {
                        adapter: "hashnet".into(),
                        reason: "down".into(),
                    })
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_first_success() {
        let client = client(RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
        });
        let calls = std::sync::atomic::AtomicU32::new(0);
        let result = client
            .with_retry("op", || {
                let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(AdapterError::Unavailable {
                            adapter: "hashnet".into(),
                            reason: "down".into(),
                        })
                    } else {
                        Ok(7u32)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreachable_adapter_reports_unavailable() {
        let client = client(RetryPolicy {
            max_attempts: 1,
            retry_delay: Duration::from_millis(1),
        });
        let err = client
            .publish(AdapterPublishRequest {
                event_type: "ProductAdded".to_string(),
                data_location: "https://ledger.example/events?hl=0xabc".to_string(),
                relevant_metadata: vec![],
                entity_id: format!("0x{}", "11".repeat(32)),
                previous_entity_hash: format!("0x{}", "22".repeat(32)),
            })
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(!client.health_check().await);
    }
}
