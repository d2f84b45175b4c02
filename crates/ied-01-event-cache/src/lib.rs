//! # IED-01 Event Cache
//!
//! Set-backed store of cross-ledger event knowledge. Two logical keys
//! anchor the whole engine:
//!
//! - `publishedEvents:<chainId>`: global ids known to exist on that
//!   ledger (written on direct publication success and on replication
//!   success).
//! - `notifiedEvents`: global ids the consumer has been notified for
//!   at least once.
//!
//! ## Module Structure
//!
//! ```text
//! ied-01-event-cache/
//! ├── keys.rs     # Cache key layout
//! ├── ports.rs    # SetStore port (the Redis-shaped surface)
//! ├── memory.rs   # Bundled in-memory store
//! └── service.rs  # CrossLedgerCache operations
//! ```
//!
//! The store port is exactly the set-primitive surface a Redis client
//! exposes; a persistent deployment swaps the bundled in-memory store
//! for one backed by the shared cache without touching the service.

pub mod keys;
pub mod memory;
pub mod ports;
pub mod service;

pub use memory::InMemorySetStore;
pub use ports::{SetStore, StoreError};
pub use service::{CacheStats, CrossLedgerCache};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
