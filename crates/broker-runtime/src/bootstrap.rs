//! # Bootstrap
//!
//! Startup choreography: verify the cache, health-check the adapters,
//! and install the internal wildcard subscriptions that make every
//! ledger's event stream flow back into the replicator.
//!
//! The callback path of each internal subscription encodes the source
//! adapter name; that path is how the replicator learns the source
//! ledger without trusting the event body.

use crate::container::SubsystemContainer;
use futures::future::join_all;
use ied_02_adapter_gateway::AdapterSubscribeRequest;
use thiserror::Error;
use tracing::{error, info, warn};

/// Fatal startup failures (production only; development degrades).
#[derive(Debug, Clone, Error)]
pub enum BootstrapError {
    /// Cache unreachable in production.
    #[error("cache unreachable: {0}")]
    CacheUnavailable(String),

    /// Zero healthy adapters in production.
    #[error("no healthy adapters")]
    NoHealthyAdapters,
}

/// What bootstrap found and installed.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// Whether the cache answered its ping.
    pub cache_up: bool,
    /// Names of the adapters that passed the health check.
    pub healthy_adapters: Vec<String>,
    /// Internal wildcard subscriptions successfully installed.
    pub internal_subscriptions: usize,
}

/// Run the startup sequence against an assembled container.
pub async fn run(container: &SubsystemContainer) -> Result<BootstrapReport, BootstrapError> {
    let config = &container.config;

    // 1. Cache connectivity.
    let cache_up = match container.cache.ping().await {
        Ok(()) => true,
        Err(e) => {
            if config.environment.is_production() {
                error!(error = %e, "Cache unreachable; refusing to start");
                return Err(BootstrapError::CacheUnavailable(e.to_string()));
            }
            warn!(
                error = %e,
                "Cache unreachable; starting degraded (operations needing the cache will fail)"
            );
            false
        }
    };

    // 2. Adapter health.
    let overview = container.registry.health_overview().await;
    let healthy_adapters: Vec<String> = overview
        .iter()
        .filter(|(_, healthy)| *healthy)
        .map(|(name, _)| name.clone())
        .collect();
    for (name, healthy) in &overview {
        info!(adapter = %name, healthy, "Adapter health checked");
    }

    if healthy_adapters.is_empty() {
        if config.environment.is_production() {
            error!("No healthy adapters; refusing to start");
            return Err(BootstrapError::NoHealthyAdapters);
        }
        warn!("No healthy adapters; continuing without internal subscriptions");
        return Ok(BootstrapReport {
            cache_up,
            healthy_adapters,
            internal_subscriptions: 0,
        });
    }

    // 3. Internal wildcard subscriptions, one per adapter, callback
    //    path keyed by adapter name.
    let installs = container.registry.snapshot().into_iter().map(|adapter| {
        let body = AdapterSubscribeRequest {
            event_types: config.internal_subscription_event_types.clone(),
            notification_endpoint: config.internal_notification_url(adapter.name()),
            metadata: config.internal_subscription_metadata.clone(),
        };
        async move {
            match adapter.subscribe(body).await {
                Ok(()) => {
                    info!(adapter = %adapter.name(), "Internal subscription installed");
                    true
                }
                Err(e) => {
                    warn!(
                        adapter = %adapter.name(),
                        error = %e,
                        "Internal subscription failed"
                    );
                    false
                }
            }
        }
    });
    let internal_subscriptions = join_all(installs)
        .await
        .into_iter()
        .filter(|ok| *ok)
        .count();

    info!(
        cache_up,
        healthy = healthy_adapters.len(),
        internal_subscriptions,
        "Bootstrap complete"
    );

    Ok(BootstrapReport {
        cache_up,
        healthy_adapters,
        internal_subscriptions,
    })
}
