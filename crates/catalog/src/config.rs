//! Metadata lookup configuration.

use std::time::Duration;

use bookfinder_availability::config::{DEFAULT_MEDIUM_TIMEOUT, DEFAULT_USER_AGENT};
use serde::Deserialize;
use tracing::warn;

/// Public volumes search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// How long a lookup result, including "nothing found", is reused.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

const ENV_ENDPOINT: &str = "BOOKFINDER_CATALOG_ENDPOINT";
const ENV_TIMEOUT: &str = "BOOKFINDER_CATALOG_TIMEOUT_SECS";
const ENV_CACHE_TTL: &str = "BOOKFINDER_CATALOG_CACHE_TTL_SECS";
const ENV_USER_AGENT: &str = "BOOKFINDER_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub endpoint: String,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    #[serde(with = "duration_secs")]
    pub cache_ttl: Duration,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_MEDIUM_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Defaults overridden by `BOOKFINDER_CATALOG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(secs) = parse_secs(&lookup, ENV_TIMEOUT) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_secs(&lookup, ENV_CACHE_TTL) {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }

        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a whole number of seconds", key, raw);
            None
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("duration must be a non-negative number of seconds"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}
