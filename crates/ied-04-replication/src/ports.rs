//! Inbound port of the replication subsystem.

use async_trait::async_trait;
use shared_types::Event;

/// Replication service - inbound port.
///
/// Invoked from the adapter-facing notification webhook. The source
/// chain comes from the webhook path, never from the event body.
#[async_trait]
pub trait ReplicationApi: Send + Sync {
    /// Process one inbound notification.
    ///
    /// Infallible at the signature: every failure mode is internal
    /// (logged and abandoned), because the webhook has already been
    /// acknowledged by the time this runs.
    async fn handle_incoming(&self, event: Event, source_chain: &str);
}
