//! In-process subscription store.

use crate::domain::SubscriptionRecord;
use parking_lot::RwLock;
use uuid::Uuid;

/// Concurrent map of live consumer subscriptions.
///
/// Readers (notification dispatch) and writers (subscribe, remove)
/// share a `parking_lot::RwLock`; dispatch works on a cloned snapshot
/// so the lock is never held across an outbound call.
#[derive(Debug, Default)]
pub struct SubscriptionStore {
    records: RwLock<Vec<SubscriptionRecord>>,
}

impl SubscriptionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    pub fn insert(&self, record: SubscriptionRecord) {
        self.records.write().push(record);
    }

    /// Remove by id; `true` when a record was dropped.
    pub fn remove(&self, id: &Uuid) -> bool {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != *id);
        records.len() < before
    }

    /// Snapshot of every record.
    #[must_use]
    pub fn all(&self) -> Vec<SubscriptionRecord> {
        self.records.read().clone()
    }

    /// Snapshot of the records covering `event_type`.
    #[must_use]
    pub fn matching(&self, event_type: &str) -> Vec<SubscriptionRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.matches(event_type))
            .cloned()
            .collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
