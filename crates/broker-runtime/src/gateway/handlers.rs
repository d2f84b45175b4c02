//! Route handlers.

use crate::gateway::error::{epoch_millis, ApiFailure};
use crate::gateway::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ied_03_publication::PublicationApi;
use ied_04_replication::ReplicationApi;
use ied_05_subscriptions::SubscriptionApi;
use shared_types::{DistributionError, Event, PublishEventRequest, SubscribeRequest};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// `POST /api/v1/publishEvent` - consumer-synchronous fan-out.
pub async fn publish_event(
    State(state): State<AppState>,
    Json(request): Json<PublishEventRequest>,
) -> Response {
    let include_details = !state.container.config.environment.is_production();

    if let Err(e) = request.validate() {
        return ApiFailure::from_error(&e, include_details).into_response();
    }

    match state.container.publisher.publish_to_all(request).await {
        Ok(report) if report.success => (StatusCode::CREATED, Json(report)).into_response(),
        Ok(report) => {
            let rows = serde_json::to_value(&report.adapters).unwrap_or_default();
            ApiFailure::from_error(&DistributionError::AllAdaptersFailed, include_details)
                .with_details(serde_json::json!({ "adapters": rows }), include_details)
                .into_response()
        }
        Err(e) => ApiFailure::from_error(&e, include_details).into_response(),
    }
}

/// `POST /api/v1/subscribe` - install a consumer subscription.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Response {
    let include_details = !state.container.config.environment.is_production();

    if let Err(e) = request.validate() {
        return ApiFailure::from_error(&e, include_details).into_response();
    }

    match state.container.subscriptions.subscribe(request).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(e) => ApiFailure::from_error(&e, include_details).into_response(),
    }
}

/// `GET /api/v1/subscriptions` - live consumer subscriptions.
pub async fn list_subscriptions(State(state): State<AppState>) -> Response {
    Json(state.container.subscriptions.subscriptions()).into_response()
}

/// `DELETE /api/v1/subscriptions/{id}` - drop a consumer subscription.
pub async fn remove_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    if state.container.subscriptions.remove(&id) {
        Json(serde_json::json!({ "removed": id })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "NotFound",
                "message": format!("no subscription {id}"),
                "timestamp": epoch_millis(),
            })),
        )
            .into_response()
    }
}

/// `POST /internal/eventNotification/{adapterName}` - adapter webhook.
///
/// Fire-and-forget: the adapter gets its `200 OK` immediately and the
/// replication pass (including the propagation-delay wait) runs in a
/// spawned task. The source chain comes from the path, never from the
/// event body.
pub async fn event_notification(
    State(state): State<AppState>,
    Path(adapter_name): Path<String>,
    Json(event): Json<Event>,
) -> Response {
    let Some(source_chain) = state
        .container
        .registry
        .chain_id_of(&adapter_name)
        .map(str::to_string)
    else {
        warn!(adapter = %adapter_name, "Notification from unknown adapter ignored");
        return Json(serde_json::json!({ "status": "ignored" })).into_response();
    };

    info!(
        adapter = %adapter_name,
        chain = %source_chain,
        event_type = %event.event_type,
        "Adapter notification accepted"
    );

    let replicator = Arc::clone(&state.container.replicator);
    tokio::spawn(async move {
        replicator.handle_incoming(event, &source_chain).await;
    });

    Json(serde_json::json!({ "status": "accepted" })).into_response()
}

/// `POST /internal/desmosNotification` - consumer-dispatch webhook.
///
/// Fire-and-forget like the adapter webhook.
pub async fn desmos_notification(
    State(state): State<AppState>,
    Json(event): Json<Event>,
) -> Response {
    let subscriptions = Arc::clone(&state.container.subscriptions);
    tokio::spawn(async move {
        subscriptions.handle_consumer_notification(event).await;
    });

    Json(serde_json::json!({ "status": "accepted" })).into_response()
}

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Response {
    let cache_up = state.container.cache.ping().await.is_ok();
    let overview = state.container.registry.health_overview().await;
    let all_adapters_up = overview.iter().all(|(_, up)| *up);

    let status = if !cache_up {
        "DOWN"
    } else if all_adapters_up {
        "UP"
    } else {
        "DEGRADED"
    };

    let body = serde_json::json!({
        "status": status,
        "redis": if cache_up { "UP" } else { "DOWN" },
        "adapters": overview
            .iter()
            .map(|(name, up)| serde_json::json!({
                "name": name,
                "status": if *up { "UP" } else { "DOWN" },
            }))
            .collect::<Vec<_>>(),
        "subscriptions": state.container.subscriptions.subscriptions().len(),
    });

    let code = if status == "UP" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body)).into_response()
}

/// `GET /stats`.
pub async fn stats(State(state): State<AppState>) -> Response {
    let include_details = !state.container.config.environment.is_production();
    let chain_ids = state.container.registry.chain_ids();

    let cache_stats = match state.container.cache.stats(&chain_ids).await {
        Ok(stats) => stats,
        Err(e) => return ApiFailure::from_error(&e, include_details).into_response(),
    };

    let adapters: Vec<_> = state
        .container
        .registry
        .iter()
        .map(|a| serde_json::json!({ "name": a.name(), "chainId": a.chain_id() }))
        .collect();

    Json(serde_json::json!({
        "cache": cache_stats,
        "subscriptions": state.container.subscriptions.subscriptions().len(),
        "uptimeSeconds": state.container.started_at.elapsed().as_secs(),
        "memory": { "rssBytes": resident_set_bytes() },
        "adapters": adapters,
    }))
    .into_response()
}

/// Resident set size from `/proc/self/status` (Linux); 0 elsewhere.
fn resident_set_bytes() -> u64 {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return 0;
    };
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
        .unwrap_or(0)
}
