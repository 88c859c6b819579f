//! Resolver configuration.
//!
//! Every tunable the resolvers use lives here and is passed in at construction
//! time. Defaults reflect observed source latency: the library OPACs answer
//! within the short budget, the bookstore search and retail chain pages need
//! the medium one.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Desktop browser user agent; some sources refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default short request budget.
pub const DEFAULT_SHORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default medium request budget.
pub const DEFAULT_MEDIUM_TIMEOUT: Duration = Duration::from_secs(15);

/// Branch name used to filter the retail chain stock page.
pub const DEFAULT_STORE_KEYWORD: &str = "各務原店";

/// Number of keywords a search history keeps.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

const ENV_USER_AGENT: &str = "BOOKFINDER_USER_AGENT";
const ENV_SHORT_TIMEOUT: &str = "BOOKFINDER_SHORT_TIMEOUT_SECS";
const ENV_MEDIUM_TIMEOUT: &str = "BOOKFINDER_MEDIUM_TIMEOUT_SECS";
const ENV_STORE_KEYWORD: &str = "BOOKFINDER_STORE_KEYWORD";
const ENV_HISTORY_CAPACITY: &str = "BOOKFINDER_HISTORY_CAPACITY";

/// Configuration shared by the HTTP layer and all resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    pub user_agent: String,
    #[serde(with = "duration_secs")]
    pub short_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub medium_timeout: Duration,
    pub store_keyword: String,
    pub history_capacity: usize,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            short_timeout: DEFAULT_SHORT_TIMEOUT,
            medium_timeout: DEFAULT_MEDIUM_TIMEOUT,
            store_keyword: DEFAULT_STORE_KEYWORD.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl AvailabilityConfig {
    /// Defaults overridden by `BOOKFINDER_*` environment variables.
    ///
    /// Unparseable numeric values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(user_agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_SHORT_TIMEOUT) {
            config.short_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_MEDIUM_TIMEOUT) {
            config.medium_timeout = Duration::from_secs(secs);
        }
        if let Some(store) = lookup(ENV_STORE_KEYWORD).filter(|v| !v.trim().is_empty()) {
            config.store_keyword = store;
        }
        if let Some(capacity) = parse_var::<usize>(&lookup, ENV_HISTORY_CAPACITY) {
            config.history_capacity = capacity;
        }

        config
    }

    /// Same budget for every request. Mostly useful in tests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.short_timeout = timeout;
        self.medium_timeout = timeout;
        self
    }

    pub fn with_store_keyword(mut self, store_keyword: impl Into<String>) -> Self {
        self.store_keyword = store_keyword.into();
        self
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
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
            return Err(serde::de::Error::custom("timeout must be a non-negative number of seconds"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AvailabilityConfig::default();
        assert_eq!(config.short_timeout, Duration::from_secs(10));
        assert_eq!(config.medium_timeout, Duration::from_secs(15));
        assert_eq!(config.store_keyword, "各務原店");
        assert_eq!(config.history_capacity, 5);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_SHORT_TIMEOUT, "3"),
            (ENV_MEDIUM_TIMEOUT, "not-a-number"),
            (ENV_STORE_KEYWORD, "岐阜店"),
            (ENV_HISTORY_CAPACITY, "8"),
        ]
        .into_iter()
        .collect();

        let config = AvailabilityConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.short_timeout, Duration::from_secs(3));
        assert_eq!(config.medium_timeout, DEFAULT_MEDIUM_TIMEOUT);
        assert_eq!(config.store_keyword, "岐阜店");
        assert_eq!(config.history_capacity, 8);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: AvailabilityConfig =
            serde_json::from_str(r#"{"short_timeout": 0.5, "store_keyword": "柳津店"}"#).unwrap();
        assert_eq!(config.short_timeout, Duration::from_millis(500));
        assert_eq!(config.medium_timeout, DEFAULT_MEDIUM_TIMEOUT);
        assert_eq!(config.store_keyword, "柳津店");
    }

    #[test]
    fn test_deserialize_rejects_negative_timeout() {
        let result: Result<AvailabilityConfig, _> =
            serde_json::from_str(r#"{"medium_timeout": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_timeout() {
        let config = AvailabilityConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(config.short_timeout, Duration::ZERO);
        assert_eq!(config.medium_timeout, Duration::ZERO);
    }
}
