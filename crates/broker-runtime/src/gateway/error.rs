//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shared_types::DistributionError;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wire shape of a failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable kind.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Extra context, only outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Epoch milliseconds.
    pub timestamp: u64,
}

/// A `DistributionError` ready to leave as HTTP.
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiFailure {
    /// Map an engine error to its status code and body.
    pub fn from_error(err: &DistributionError, include_details: bool) -> Self {
        let status = match err {
            DistributionError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let details = if include_details {
            Some(serde_json::json!({ "kind": err.kind() }))
        } else {
            None
        };
        Self {
            status,
            body: ErrorBody {
                error: err.kind(),
                message: err.to_string(),
                details,
                timestamp: epoch_millis(),
            },
        }
    }

    /// Attach extra context (per-adapter rows and the like) when the
    /// environment allows it.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value, include_details: bool) -> Self {
        if include_details {
            self.body.details = Some(details);
        }
        self
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Current time as epoch milliseconds.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let failure = ApiFailure::from_error(
            &DistributionError::Validation("eventType must not be empty".into()),
            false,
        );
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.body.error, "ValidationError");
        assert!(failure.body.details.is_none());
    }

    #[test]
    fn test_missing_global_id_maps_to_500() {
        let failure =
            ApiFailure::from_error(&DistributionError::MissingGlobalId("https://x".into()), true);
        assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(failure.body.details.is_some());
    }

    #[test]
    fn test_details_suppressed_in_production() {
        let failure = ApiFailure::from_error(&DistributionError::AllAdaptersFailed, false)
            .with_details(serde_json::json!({"rows": []}), false);
        assert!(failure.body.details.is_none());
    }
}
