//! Subscription domain types.

use serde::Serialize;
use std::time::SystemTime;
use uuid::Uuid;

/// One consumer subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    /// Fresh id per subscription; two identical requests get two
    /// independent records.
    pub id: Uuid,

    /// Event types this subscription covers; empty or containing
    /// `"*"` means every type.
    pub event_types: Vec<String>,

    /// Consumer webhook to forward matching events to.
    pub callback_url: String,

    /// Creation time (epoch milliseconds).
    pub created_at: u64,
}

impl SubscriptionRecord {
    /// New record with a fresh id.
    #[must_use]
    pub fn new(event_types: Vec<String>, callback_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_types,
            callback_url,
            created_at: epoch_millis(),
        }
    }

    /// Whether this subscription covers `event_type`.
    #[must_use]
    pub fn matches(&self, event_type: &str) -> bool {
        self.event_types.is_empty()
            || self
                .event_types
                .iter()
                .any(|t| t == "*" || t == event_type)
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_type_match() {
        let record = SubscriptionRecord::new(
            vec!["ProductAdded".to_string()],
            "https://desmos.example/hook".to_string(),
        );
        assert!(record.matches("ProductAdded"));
        assert!(!record.matches("ProductRemoved"));
    }

    #[test]
    fn test_wildcard_matches_everything() {
        let record = SubscriptionRecord::new(
            vec!["*".to_string()],
            "https://desmos.example/hook".to_string(),
        );
        assert!(record.matches("ProductAdded"));
        assert!(record.matches("anything"));
    }

    #[test]
    fn test_empty_type_set_matches_everything() {
        let record =
            SubscriptionRecord::new(vec![], "https://desmos.example/hook".to_string());
        assert!(record.matches("ProductAdded"));
    }

    #[test]
    fn test_ids_are_fresh_per_record() {
        let a = SubscriptionRecord::new(vec!["*".to_string()], "https://x.example".to_string());
        let b = SubscriptionRecord::new(vec!["*".to_string()], "https://x.example".to_string());
        assert_ne!(a.id, b.id);
    }
}
