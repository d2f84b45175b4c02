//! Adapter error types.

use shared_types::DistributionError;
use thiserror::Error;

/// Failures of a single adapter invocation.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Transport failure, timeout, or 5xx. Retried up to the budget.
    #[error("{reason}")]
    Unavailable {
        /// Adapter name.
        adapter: String,
        /// Failure description.
        reason: String,
    },

    /// 4xx from the adapter: the request is permanently wrong for this
    /// ledger. Never retried.
    #[error("rejected with status {status}: {reason}")]
    Rejected {
        /// Adapter name.
        adapter: String,
        /// HTTP status code.
        status: u16,
        /// Failure description.
        reason: String,
    },

    /// 2xx with a body the client could not interpret.
    #[error("invalid response: {reason}")]
    InvalidResponse {
        /// Adapter name.
        adapter: String,
        /// Parse failure description.
        reason: String,
    },
}

impl AdapterError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Name of the adapter that produced this error.
    #[must_use]
    pub fn adapter(&self) -> &str {
        match self {
            Self::Unavailable { adapter, .. }
            | Self::Rejected { adapter, .. }
            | Self::InvalidResponse { adapter, .. } => adapter,
        }
    }
}

impl From<AdapterError> for DistributionError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Unavailable { adapter, reason } => {
                DistributionError::AdapterUnavailable { adapter, reason }
            }
            AdapterError::Rejected {
                adapter,
                status,
                reason,
            } => DistributionError::AdapterRejected {
                adapter,
                reason: format!("status {status}: {reason}"),
            },
            AdapterError::InvalidResponse { adapter, reason } => {
                DistributionError::AdapterUnavailable { adapter, reason }
            }
        }
    }
}
