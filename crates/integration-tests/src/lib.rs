//! # Integration Tests Crate
//!
//! Cross-subsystem scenarios for the Interchain Event Distributor,
//! driven against scripted mock adapters and the in-memory set store.
//!
//! ## Structure
//!
//! ```text
//! integration-tests/
//! └── src/
//!     ├── lib.rs         # This file
//!     ├── harness.rs     # Distributor harness (mock-wired engine)
//!     └── scenarios.rs   # End-to-end distribution scenarios
//! ```
//!
//! ## Scenario Coverage
//!
//! 1. **Direct publish**: all adapters healthy; partial outage.
//! 2. **Replication**: propagation-delay suppression under concurrent
//!    arrivals; re-entry convergence.
//! 3. **Consumer notification**: wildcard matching and dedup.
//! 4. **Bootstrap**: one internal wildcard subscription per adapter.

pub mod harness;

#[cfg(test)]
mod scenarios;
