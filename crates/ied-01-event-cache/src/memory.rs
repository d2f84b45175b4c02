//! In-memory set store.
//!
//! The bundled [`SetStore`] implementation. Entry-level locking via
//! `DashMap` keeps concurrent adds on different keys contention-free.

use crate::ports::{SetStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

/// DashMap-backed set store.
#[derive(Debug, Default)]
pub struct InMemorySetStore {
    sets: DashMap<String, HashSet<String>>,
}

impl InMemorySetStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SetStore for InMemorySetStore {
    async fn sadd(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entry = self.sets.entry(key.to_string()).or_default();
        Ok(entry.insert(member.to_string()))
    }

    async fn sismember(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        Ok(self
            .sets
            .get(key)
            .map(|set| set.contains(member))
            .unwrap_or(false))
    }

    async fn scard(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self.sets.get(key).map(|set| set.len() as u64).unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
