//! # Core Domain Entities
//!
//! The [`Event`] is the unit distributed across ledgers. One logical
//! event may be carried by every configured ledger; its identity across
//! all of them is the global id embedded in `data_location` (the `hl`
//! query parameter).

use serde::{Deserialize, Serialize};

/// An event as it flows through the distributor.
///
/// This is the normalized internal representation. Adapters return
/// slightly different shapes across versions (`origin` vs
/// `publisherAddress`); the serde aliases absorb that drift at the
/// boundary so the engine never branches on adapter vintage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Sequence number assigned by the origin adapter.
    pub id: u64,

    /// Adapter-assigned timestamp (epoch milliseconds).
    pub timestamp: u64,

    /// Logical channel the event belongs to.
    pub event_type: String,

    /// URL locating the event payload. Carries the global id in its
    /// `hl` query parameter and is forwarded byte-for-byte.
    pub data_location: String,

    /// 32-byte entity identifier, `0x`-prefixed lowercase hex.
    pub entity_id_hash: String,

    /// Hash of the previous entity version, same encoding.
    pub previous_entity_hash: String,

    /// Short categorical tags (environment filters and the like).
    #[serde(default)]
    pub relevant_metadata: Vec<String>,

    /// Address of the publishing party, when the adapter reports one.
    /// Older adapter versions call this field `origin`.
    #[serde(default, alias = "origin", skip_serializing_if = "Option::is_none")]
    pub publisher_address: Option<String>,

    /// Address of the original author, when the adapter reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_address: Option<String>,

    /// Source ledger name, present only on events received from
    /// adapters. Never forwarded: stripped before an event re-enters
    /// any ledger or reaches the consumer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl Event {
    /// Return a copy with the transport-only `network` attribute
    /// removed. Idempotent.
    #[must_use]
    pub fn without_network(&self) -> Self {
        Self {
            network: None,
            ..self.clone()
        }
    }

    /// Whether the event carries a source-ledger marker.
    #[must_use]
    pub fn has_network(&self) -> bool {
        self.network.is_some()
    }
}
