//! # Interchain Event Distributor Runtime
//!
//! The composition root. Everything the engine needs at runtime is
//! constructed here once, owned by the [`container::SubsystemContainer`],
//! and handed to the HTTP gateway as explicit `Arc` handles; there are
//! no ambient globals.
//!
//! ## Startup Sequence
//!
//! 1. Configuration from the environment (`container::config`).
//! 2. Container build: store → cache → registry → subsystem services.
//! 3. Bootstrap: cache ping, adapter health checks, internal wildcard
//!    subscriptions so replication starts receiving notifications.
//! 4. Gateway serve with graceful shutdown.

pub mod bootstrap;
pub mod container;
pub mod gateway;

pub use container::{BrokerConfig, SubsystemContainer};
