//! # HTTP Gateway
//!
//! The distributor's HTTP surface. Consumer-synchronous routes
//! (publish, subscribe) wait for the fan-out and report per-adapter
//! detail; adapter-facing webhook routes acknowledge immediately and
//! run the risky work in a spawned task so adapters can never back up
//! on the engine.

pub mod error;
pub mod handlers;

use crate::container::SubsystemContainer;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub container: Arc<SubsystemContainer>,
}

/// Build the gateway router over an assembled container.
pub fn build_router(container: Arc<SubsystemContainer>) -> Router {
    let state = AppState { container };

    Router::new()
        .route("/api/v1/publishEvent", post(handlers::publish_event))
        .route("/api/v1/subscribe", post(handlers::subscribe))
        .route("/api/v1/subscriptions", get(handlers::list_subscriptions))
        .route(
            "/api/v1/subscriptions/:id",
            delete(handlers::remove_subscription),
        )
        .route(
            "/internal/eventNotification/:adapter_name",
            post(handlers::event_notification),
        )
        .route(
            "/internal/desmosNotification",
            post(handlers::desmos_notification),
        )
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .with_state(state)
}
