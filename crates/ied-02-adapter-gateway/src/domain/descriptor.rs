//! Adapter descriptors.

use tracing::warn;

/// Static description of one configured ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// Unique, stable adapter name.
    pub name: String,

    /// Base URL of the adapter service, without trailing slash.
    pub base_url: String,

    /// Stable ledger identifier; the cache key suffix.
    pub chain_id: String,

    /// Path of the publish endpoint.
    pub publish_path: String,

    /// Path of the subscribe endpoint (POST to install, GET to list).
    pub subscribe_path: String,

    /// Path of the health endpoint.
    pub health_path: String,
}

impl AdapterDescriptor {
    /// Build a descriptor with the default endpoint paths.
    ///
    /// When `chain_id` is absent the adapter name is used as the cache
    /// key suffix. That keeps the engine running but ties cache layout
    /// to the name, so it is logged as a warning.
    #[must_use]
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, chain_id: Option<String>) -> Self {
        let name = name.into();
        let chain_id = match chain_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                warn!(
                    adapter = %name,
                    "No chain id configured; falling back to adapter name for cache keying"
                );
                name.clone()
            }
        };
        Self {
            name,
            base_url: trim_trailing_slash(base_url.into()),
            chain_id,
            publish_path: "/publish".to_string(),
            subscribe_path: "/subscribe".to_string(),
            health_path: "/health".to_string(),
        }
    }

    /// Full URL of the publish endpoint.
    #[must_use]
    pub fn publish_url(&self) -> String {
        format!("{}{}", self.base_url, self.publish_path)
    }

    /// Full URL of the subscribe endpoint.
    #[must_use]
    pub fn subscribe_url(&self) -> String {
        format!("{}{}", self.base_url, self.subscribe_path)
    }

    /// Full URL of the health endpoint.
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health_path)
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builds_endpoint_urls() {
        let desc = AdapterDescriptor::new("hashnet", "http://hashnet:8080/", Some("1".into()));
        assert_eq!(desc.publish_url(), "http://hashnet:8080/publish");
        assert_eq!(desc.subscribe_url(), "http://hashnet:8080/subscribe");
        assert_eq!(desc.health_url(), "http://hashnet:8080/health");
    }

    #[test]
    fn test_missing_chain_id_falls_back_to_name() {
        let desc = AdapterDescriptor::new("alastria", "http://alastria:8080", None);
        assert_eq!(desc.chain_id, "alastria");
    }

    #[test]
    fn test_blank_chain_id_falls_back_to_name() {
        let desc = AdapterDescriptor::new("alastria", "http://alastria:8080", Some("  ".into()));
        assert_eq!(desc.chain_id, "alastria");
    }

    #[test]
    fn test_configured_chain_id_wins() {
        let desc = AdapterDescriptor::new("alastria", "http://alastria:8080", Some("2".into()));
        assert_eq!(desc.chain_id, "2");
    }
}
