//! # Shared Types Crate
//!
//! Domain types shared by every subsystem of the Interchain Event
//! Distributor: the normalized [`Event`] entity, the consumer-facing
//! request envelopes, the error taxonomy, and global-id extraction.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a subsystem
//!   boundary is defined here.
//! - **Stable internal representation**: adapters drift in the shapes
//!   they return; normalization happens at deserialization so the rest
//!   of the engine sees one [`Event`] shape.
//! - **Transport fields stay at the transport**: the `network` attribute
//!   identifies the source ledger on inbound notifications and is
//!   stripped before an event leaves the engine in any direction.

pub mod entities;
pub mod errors;
pub mod global_id;
pub mod hex;
pub mod requests;

pub use entities::Event;
pub use errors::DistributionError;
pub use global_id::{extract_global_id, GlobalId};
pub use hex::is_bytes32_hex;
pub use requests::{AdapterOutcome, PublishEventRequest, SubscribeRequest};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
