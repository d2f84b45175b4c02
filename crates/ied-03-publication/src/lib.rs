//! # IED-03 Publication
//!
//! Direct fan-out: a consumer publication goes to every configured
//! ledger concurrently, and the response reports each adapter's
//! outcome individually.
//!
//! ## Partial Success
//!
//! The aggregate succeeds when at least one ledger accepted the event.
//! The replication subsystem repairs the ledgers that missed it, so a
//! single healthy adapter is enough for the publication to be durable.
//! This is the liveness argument under partial adapter outages.

pub mod ports;
pub mod service;

pub use ports::{PublicationApi, PublishReport};
pub use service::PublisherService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
