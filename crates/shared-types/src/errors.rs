//! # Error Types
//!
//! The shared failure taxonomy. Subsystems define local error enums
//! where they need finer structure (the adapter gateway distinguishes
//! retryable from terminal failures); everything that crosses a
//! subsystem boundary converges on [`DistributionError`].

use thiserror::Error;

/// Errors surfaced by the event-flow engine.
#[derive(Debug, Clone, Error)]
pub enum DistributionError {
    /// Malformed or missing fields in an inbound request. Not retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// `data_location` carries no usable `hl` query parameter.
    #[error("no global id in data location: {0}")]
    MissingGlobalId(String),

    /// Transport failure, timeout, or 5xx after the retry budget.
    #[error("adapter {adapter} unavailable: {reason}")]
    AdapterUnavailable { adapter: String, reason: String },

    /// 4xx from the adapter. Terminal, never retried.
    #[error("adapter {adapter} rejected the request: {reason}")]
    AdapterRejected { adapter: String, reason: String },

    /// A cache operation failed; the protected operation fails with it.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Fan-out finished with zero successful adapters.
    #[error("all adapters failed")]
    AllAdaptersFailed,

    /// Outbound consumer POST failed. Logged, never retried.
    #[error("consumer webhook failed: {0}")]
    ConsumerWebhookFailed(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DistributionError {
    /// Short machine-readable kind, used in HTTP error bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::MissingGlobalId(_) => "MissingGlobalId",
            Self::AdapterUnavailable { .. } => "AdapterUnavailable",
            Self::AdapterRejected { .. } => "AdapterRejected",
            Self::CacheUnavailable(_) => "CacheUnavailable",
            Self::AllAdaptersFailed => "AllAdaptersFailed",
            Self::ConsumerWebhookFailed(_) => "ConsumerWebhookFailed",
            Self::Internal(_) => "InternalError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        let err = DistributionError::MissingGlobalId("https://x".into());
        assert_eq!(err.kind(), "MissingGlobalId");
        assert_eq!(DistributionError::AllAdaptersFailed.kind(), "AllAdaptersFailed");
    }

    #[test]
    fn test_adapter_error_messages_carry_context() {
        let err = DistributionError::AdapterUnavailable {
            adapter: "hashnet".into(),
            reason: "Network timeout".into(),
        };
        assert!(err.to_string().contains("hashnet"));
        assert!(err.to_string().contains("Network timeout"));
    }
}
