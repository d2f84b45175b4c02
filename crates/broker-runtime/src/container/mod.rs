//! # Subsystem Container
//!
//! Central container holding the engine's subsystem instances with
//! explicit lifetimes and dependency injection: the cache feeds the
//! publisher, replicator, and subscription registry; the adapter
//! registry is shared read-only by all three.

pub mod config;
pub mod subsystems;

pub use config::{AdapterConfig, BrokerConfig, ConfigError, Environment};
pub use subsystems::SubsystemContainer;
