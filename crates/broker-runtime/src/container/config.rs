//! # Broker Configuration
//!
//! Environment-driven configuration with sane defaults and fail-fast
//! validation. Adapter sets are dynamic: `ADAPTER_NAMES` enumerates
//! uppercase prefixes, and `<NAME>_ADAPTER_URL` / `<NAME>_ADAPTER_NAME`
//! / `<NAME>_CHAIN_ID` describe each adapter.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development: degraded starts allowed.
    #[default]
    Development,
    /// Production: cache and at least one healthy adapter required.
    Production,
    /// Test runs.
    Test,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Whether startup failures must abort the process.
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// One configured adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Adapter name; defaults to the lowercased prefix.
    pub name: String,
    /// Base URL of the adapter service.
    pub url: String,
    /// Stable chain id; falls back to the name when absent.
    pub chain_id: Option<String>,
}

/// Cache connection settings, recognized for the Redis-backed store
/// swap. The bundled in-memory store ignores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

/// Complete broker configuration.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Public base URL, used to build internal subscription callbacks.
    pub base_url: String,
    /// Cache connection settings.
    pub cache: CacheSettings,
    /// Per-attempt adapter request timeout.
    pub adapter_timeout: Duration,
    /// Per-call consumer notification timeout.
    pub notification_timeout: Duration,
    /// Adapter retry attempts, including the first.
    pub max_retry_attempts: u32,
    /// Base delay between adapter retries.
    pub retry_delay: Duration,
    /// Propagation-delay window before the missing-chain check.
    pub replication_delay: Duration,
    /// Event types of the internal wildcard subscriptions.
    pub internal_subscription_event_types: Vec<String>,
    /// Metadata tags of the internal wildcard subscriptions.
    pub internal_subscription_metadata: Vec<String>,
    /// Deployment environment.
    pub environment: Environment,
    /// Configured adapters, in declaration order.
    pub adapters: Vec<AdapterConfig>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            cache: CacheSettings::default(),
            adapter_timeout: Duration::from_millis(5_000),
            notification_timeout: Duration::from_millis(5_000),
            max_retry_attempts: 3,
            retry_delay: Duration::from_millis(1_000),
            replication_delay: Duration::from_millis(15_000),
            internal_subscription_event_types: vec!["*".to_string()],
            internal_subscription_metadata: vec!["sbx".to_string()],
            environment: Environment::Development,
            adapters: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No adapters configured.
    #[error("no adapters configured: set ADAPTER_NAMES and <NAME>_ADAPTER_URL")]
    NoAdapters,

    /// An adapter prefix has no URL.
    #[error("adapter {0} has no URL: set {0}_ADAPTER_URL")]
    MissingAdapterUrl(String),

    /// Unparseable numeric variable.
    #[error("invalid value for {name}: {value}")]
    InvalidNumber { name: String, value: String },

    /// Base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A zero timeout would disable the guarded operation entirely.
    #[error("invalid timeout: {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

impl BrokerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var("PORT", defaults.port)?;
        let base_url =
            std::env::var("IED_BASE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let cache = CacheSettings {
            host: std::env::var("REDIS_HOST").unwrap_or(defaults.cache.host),
            port: parse_var("REDIS_PORT", defaults.cache.port)?,
            password: std::env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
            db: parse_var("REDIS_DB", defaults.cache.db)?,
        };

        let environment = std::env::var("NODE_ENV")
            .or_else(|_| std::env::var("ENV"))
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let config = Self {
            port,
            base_url,
            cache,
            adapter_timeout: Duration::from_millis(parse_var("ADAPTER_TIMEOUT_MS", 5_000u64)?),
            notification_timeout: Duration::from_millis(parse_var(
                "NOTIFICATION_TIMEOUT_MS",
                5_000u64,
            )?),
            max_retry_attempts: parse_var("MAX_RETRY_ATTEMPTS", defaults.max_retry_attempts)?,
            retry_delay: Duration::from_millis(parse_var("RETRY_DELAY_MS", 1_000u64)?),
            replication_delay: Duration::from_millis(parse_var("REPLICATION_DELAY_MS", 15_000u64)?),
            internal_subscription_event_types: list_var(
                "INTERNAL_SUBSCRIPTION_EVENT_TYPES",
                &["*"],
            ),
            internal_subscription_metadata: list_var("INTERNAL_SUBSCRIPTION_METADATA", &["sbx"]),
            environment,
            adapters: adapters_from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate for startup. Called by `from_env`; exposed for
    /// hand-built configurations in tests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adapters.is_empty() {
            return Err(ConfigError::NoAdapters);
        }
        if Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.adapter_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("ADAPTER_TIMEOUT_MS"));
        }
        if self.notification_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("NOTIFICATION_TIMEOUT_MS"));
        }
        if self.max_retry_attempts == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "MAX_RETRY_ATTEMPTS".to_string(),
                value: "0".to_string(),
            });
        }
        // replication_delay may be zero: tests and single-ledger
        // deployments run without the window.
        Ok(())
    }

    /// Callback URL of the internal subscription for one adapter.
    #[must_use]
    pub fn internal_notification_url(&self, adapter_name: &str) -> String {
        format!(
            "{}/internal/eventNotification/{adapter_name}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Callback URL of the consumer-notification webhook.
    #[must_use]
    pub fn consumer_notification_url(&self) -> String {
        format!(
            "{}/internal/desmosNotification",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Read the adapter set from `ADAPTER_NAMES` plus per-prefix fields.
fn adapters_from_env() -> Result<Vec<AdapterConfig>, ConfigError> {
    let names = std::env::var("ADAPTER_NAMES").unwrap_or_default();
    let mut adapters = Vec::new();

    for prefix in names
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        let prefix_upper = prefix.to_ascii_uppercase();
        let url = std::env::var(format!("{prefix_upper}_ADAPTER_URL"))
            .map_err(|_| ConfigError::MissingAdapterUrl(prefix_upper.clone()))?;
        let name = std::env::var(format!("{prefix_upper}_ADAPTER_NAME"))
            .unwrap_or_else(|_| prefix.to_ascii_lowercase());
        let chain_id = std::env::var(format!("{prefix_upper}_CHAIN_ID"))
            .ok()
            .filter(|c| !c.trim().is_empty());
        adapters.push(AdapterConfig {
            name,
            url,
            chain_id,
        });
    }

    Ok(adapters)
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn list_var(name: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}
