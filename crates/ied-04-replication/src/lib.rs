//! # IED-04 Replication
//!
//! Keeps the logical event stream consistent across ledgers: every
//! inbound adapter notification is recorded as an observation, held
//! for the propagation-delay window, and then fanned out to whichever
//! ledgers still miss the event.
//!
//! ## The Delay Gate
//!
//! Ledger propagation can surface the same event on a sibling adapter
//! shortly after its first notification. Acting immediately would
//! publish duplicates; waiting a fixed window lets those concurrent
//! arrivals land in the cache first, after which the missing-chain
//! check suppresses them. The window is per invocation, never a
//! debounce: concurrent events each run their own timer.
//!
//! ## Termination
//!
//! Adapters subscribe to the engine, the engine republishes to
//! adapters, and the adapters notify again. Set membership is the
//! termination argument: once every chain carries the global id,
//! the missing set is empty and the cycle stops. Nothing may bypass
//! that check.

pub mod ports;
pub mod service;

pub use ports::ReplicationApi;
pub use service::ReplicatorService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
