//! # IED-05 Subscriptions
//!
//! Consumer-facing subscription registry. A consumer subscription
//! installs an adapter subscription on every ledger whose callback is
//! the distributor's own notification webhook; events flowing back are
//! matched against the registry and forwarded to the consumer with
//! at-most-once semantics per global id.
//!
//! ## In-Process By Design
//!
//! Records live in memory and are lost on restart: the internal
//! wildcard subscriptions are recreated at bootstrap, and consumer
//! subscriptions are re-issued by the consumer. The registry sits
//! behind a small trait-shaped surface so a cache-backed store can be
//! swapped in without touching the notification path.

pub mod domain;
pub mod ports;
pub mod registry;
pub mod service;

pub use domain::SubscriptionRecord;
pub use ports::{
    ConsumerNotifier, HttpConsumerNotifier, MockConsumerNotifier, NotifyError, SubscriptionApi,
    SubscriptionReceipt,
};
pub use registry::SubscriptionStore;
pub use service::SubscriptionService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
