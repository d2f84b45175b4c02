//! # IED-02 Adapter Gateway
//!
//! Typed HTTP access to the ledger adapters. Each configured adapter
//! gets one client with its own connection pool, a per-attempt timeout,
//! and a bounded retry budget; the registry is the immutable, ordered
//! collection the fan-out subsystems snapshot.
//!
//! ## Module Structure
//!
//! ```text
//! ied-02-adapter-gateway/
//! ├── domain/          # Descriptor, retry policy, adapter errors
//! ├── ports.rs         # LedgerAdapter port + request/ack types + mock
//! ├── client.rs        # reqwest implementation
//! └── registry.rs      # Immutable named collection
//! ```
//!
//! ## Failure Semantics
//!
//! The client never panics into the caller: after the retry budget is
//! exhausted it returns [`AdapterError`], which callers fold into
//! per-adapter `{name, success: false, error}` rows. 4xx responses are
//! terminal; transport errors, timeouts, and 5xx are retried.

pub mod client;
pub mod domain;
pub mod ports;
pub mod registry;

pub use client::HttpAdapterClient;
pub use domain::{AdapterDescriptor, AdapterError, RetryPolicy};
pub use ports::{
    AdapterPublishRequest, AdapterSubscribeRequest, LedgerAdapter, MockLedgerAdapter, PublishAck,
};
pub use registry::{AdapterRegistry, RegistryError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
