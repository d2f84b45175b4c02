//! # Request Envelopes
//!
//! Consumer-facing request bodies and the per-adapter outcome rows
//! that aggregate responses are built from.

use crate::errors::DistributionError;
use crate::hex::is_bytes32_hex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Consumer publish request, `POST /api/v1/publishEvent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventRequest {
    /// Logical channel to publish on.
    pub event_type: String,

    /// Payload URL; must carry the global id in its `hl` parameter.
    pub data_location: String,

    /// Categorical tags attached to the publication.
    #[serde(default)]
    pub relevant_metadata: Vec<String>,

    /// 32-byte entity identifier, `0x`-prefixed hex.
    pub entity_id: String,

    /// Hash of the previous entity version, same encoding.
    pub previous_entity_hash: String,

    /// Issuer identity, when the consumer supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Consumer RPC address, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_address: Option<String>,
}

impl PublishEventRequest {
    /// Validate field shape. Global-id presence is checked separately
    /// by the publisher because its failure maps to a different error.
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.event_type.trim().is_empty() {
            return Err(DistributionError::Validation(
                "eventType must not be empty".to_string(),
            ));
        }
        if Url::parse(&self.data_location).is_err() {
            return Err(DistributionError::Validation(
                "dataLocation must be a valid URL".to_string(),
            ));
        }
        if !is_bytes32_hex(&self.entity_id) {
            return Err(DistributionError::Validation(
                "entityId must be 0x-prefixed 64-character hex".to_string(),
            ));
        }
        if !is_bytes32_hex(&self.previous_entity_hash) {
            return Err(DistributionError::Validation(
                "previousEntityHash must be 0x-prefixed 64-character hex".to_string(),
            ));
        }
        Ok(())
    }
}

/// Consumer subscription request, `POST /api/v1/subscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Event types to receive; `"*"` matches every type.
    pub event_types: Vec<String>,

    /// Consumer webhook that receives matching events.
    pub notification_endpoint: String,

    /// Issuer identity, when the consumer supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl SubscribeRequest {
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.event_types.is_empty() {
            return Err(DistributionError::Validation(
                "eventTypes must contain at least one entry".to_string(),
            ));
        }
        if self.event_types.iter().any(|t| t.trim().is_empty()) {
            return Err(DistributionError::Validation(
                "eventTypes entries must not be empty".to_string(),
            ));
        }
        if Url::parse(&self.notification_endpoint).is_err() {
            return Err(DistributionError::Validation(
                "notificationEndpoint must be a valid URL".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-adapter row in an aggregate fan-out response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterOutcome {
    /// Adapter name.
    pub name: String,

    /// Whether this adapter accepted the call.
    pub success: bool,

    /// Adapter-assigned timestamp on success (publish only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdapterOutcome {
    /// Successful publish row.
    #[must_use]
    pub fn ok(name: impl Into<String>, timestamp: Option<u64>) -> Self {
        Self {
            name: name.into(),
            success: true,
            timestamp,
            error: None,
        }
    }

    /// Failed row with the terminal error string.
    #[must_use]
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            timestamp: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_publish_request() -> PublishEventRequest {
        PublishEventRequest {
            event_type: "ProductAdded".to_string(),
            data_location: "https://ledger.example/events?hl=0xabc".to_string(),
            relevant_metadata: vec!["sbx".to_string()],
            entity_id: format!("0x{}", "11".repeat(32)),
            previous_entity_hash: format!("0x{}", "22".repeat(32)),
            iss: None,
            rpc_address: None,
        }
    }

    #[test]
    fn test_valid_publish_request_passes() {
        assert!(valid_publish_request().validate().is_ok());
    }

    #[test]
    fn test_empty_event_type_rejected() {
        let mut req = valid_publish_request();
        req.event_type = "  ".to_string();
        assert!(matches!(
            req.validate(),
            Err(DistributionError::Validation(_))
        ));
    }

    #[test]
    fn test_short_entity_id_rejected() {
        let mut req = valid_publish_request();
        req.entity_id = "0xabc".to_string();
        assert!(matches!(
            req.validate(),
            Err(DistributionError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_data_location_rejected() {
        let mut req = valid_publish_request();
        req.data_location = "not a url".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_subscribe_requires_event_types() {
        let req = SubscribeRequest {
            event_types: vec![],
            notification_endpoint: "https://desmos.example/hook".to_string(),
            iss: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_subscribe_accepts_wildcard() {
        let req = SubscribeRequest {
            event_types: vec!["*".to_string()],
            notification_endpoint: "https://desmos.example/hook".to_string(),
            iss: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_outcome_rows_serialize_camel_case() {
        let row = AdapterOutcome::ok("alastria", Some(42));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "alastria");
        assert_eq!(json["timestamp"], 42);
        assert!(json.get("error").is_none());
    }
}
