//! Adapter registry.
//!
//! Immutable after construction; subsystems snapshot it by cloning the
//! `Arc` handles. Fails fast when no adapter is configured, because an
//! empty registry makes every engine operation a no-op that would only
//! be noticed in production traffic.

use crate::ports::LedgerAdapter;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Registry construction failures.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Zero adapters configured.
    #[error("no adapters configured")]
    Empty,

    /// Two adapters share a name.
    #[error("duplicate adapter name: {0}")]
    DuplicateName(String),
}

/// Named, ordered, immutable collection of ledger adapters.
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn LedgerAdapter>>,
    by_name: HashMap<String, usize>,
}

impl AdapterRegistry {
    /// Build from the configured adapters, preserving order.
    pub fn new(adapters: Vec<Arc<dyn LedgerAdapter>>) -> Result<Self, RegistryError> {
        if adapters.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut by_name = HashMap::with_capacity(adapters.len());
        for (index, adapter) in adapters.iter().enumerate() {
            if by_name
                .insert(adapter.name().to_string(), index)
                .is_some()
            {
                return Err(RegistryError::DuplicateName(adapter.name().to_string()));
            }
        }
        for adapter in &adapters {
            info!(
                adapter = %adapter.name(),
                chain = %adapter.chain_id(),
                "Registered ledger adapter"
            );
        }
        Ok(Self { adapters, by_name })
    }

    /// Lookup by adapter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn LedgerAdapter>> {
        self.by_name.get(name).map(|&i| &self.adapters[i])
    }

    /// Chain id of a named adapter.
    #[must_use]
    pub fn chain_id_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|a| a.chain_id())
    }

    /// Ordered iteration over every adapter.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn LedgerAdapter>> {
        self.adapters.iter()
    }

    /// Snapshot of the adapter handles, in configuration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn LedgerAdapter>> {
        self.adapters.clone()
    }

    /// All chain ids, in configuration order.
    #[must_use]
    pub fn chain_ids(&self) -> Vec<String> {
        self.adapters
            .iter()
            .map(|a| a.chain_id().to_string())
            .collect()
    }

    /// Number of configured adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Never true: construction rejects the empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Health-check every adapter concurrently; returns
    /// `(name, healthy)` rows in configuration order.
    pub async fn health_overview(&self) -> Vec<(String, bool)> {
        let probes = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            async move { (adapter.name().to_string(), adapter.health_check().await) }
        });
        futures::future::join_all(probes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockLedgerAdapter;

    fn two_adapters() -> Vec<Arc<dyn LedgerAdapter>> {
        vec![
            Arc::new(MockLedgerAdapter::new("hashnet", "1")),
            Arc::new(MockLedgerAdapter::new("alastria", "2")),
        ]
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(
            AdapterRegistry::new(Vec::new()),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let adapters: Vec<Arc<dyn LedgerAdapter>> = vec![
            Arc::new(MockLedgerAdapter::new("hashnet", "1")),
            Arc::new(MockLedgerAdapter::new("hashnet", "2")),
        ];
        assert!(matches!(
            AdapterRegistry::new(adapters),
            Err(RegistryError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_lookup_and_order() {
        let registry = AdapterRegistry::new(two_adapters()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.chain_id_of("alastria"), Some("2"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.chain_ids(), vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_health_overview_reports_each_adapter() {
        let down: Arc<MockLedgerAdapter> = Arc::new(MockLedgerAdapter::new("alastria", "2"));
        down.set_healthy(false);
        let adapters: Vec<Arc<dyn LedgerAdapter>> = vec![
            Arc::new(MockLedgerAdapter::new("hashnet", "1")),
            down,
        ];
        let registry = AdapterRegistry::new(adapters).unwrap();
        let overview = registry.health_overview().await;
        assert_eq!(
            overview,
            vec![
                ("hashnet".to_string(), true),
                ("alastria".to_string(), false)
            ]
        );
    }
}
