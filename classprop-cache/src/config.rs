//! Cache configuration.

use std::env::{self, VarError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use classprop_core::constants::{DEFAULT_PROPERTY_NAME, ENV_NAME_SUFFIX, ENV_TIMEOUT_MS_SUFFIX};
use classprop_core::error::{ClassPropError, Result};

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Property name, used in errors and logs
    pub name: String,
    /// Staleness timeout; `None` caches forever
    pub timeout: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROPERTY_NAME.into(),
            timeout: None,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration for the property `name` with no timeout.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the staleness timeout. The duration is kept at full precision.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Removes the staleness timeout.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Returns the staleness timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Loads configuration from `<PREFIX>_NAME` and `<PREFIX>_TIMEOUT_MS`.
    ///
    /// A `.env` file is loaded first when present. Unset or empty variables
    /// keep their defaults.
    ///
    /// # Errors
    /// Returns `ClassPropError::Config` if the timeout is not a whole number
    /// of milliseconds or a variable is not valid unicode.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(name) = read_var(&format!("{prefix}{ENV_NAME_SUFFIX}"))? {
            config.name = name;
        }

        let timeout_var = format!("{prefix}{ENV_TIMEOUT_MS_SUFFIX}");
        if let Some(raw) = read_var(&timeout_var)? {
            let millis = raw.parse::<u64>().map_err(|e| {
                ClassPropError::Config(format!("{timeout_var}={raw:?} is not a timeout in ms: {e}"))
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }

        Ok(config)
    }
}

fn read_var(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => {
            Err(ClassPropError::Config(format!("{key} is not valid unicode")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.name, "value");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_builders() {
        let config = CacheConfig::named("schema").with_timeout(Duration::from_millis(100));
        assert_eq!(config.name, "schema");
        assert_eq!(config.timeout(), Some(Duration::from_millis(100)));

        let config = config.without_timeout();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CacheConfig::named("schema").with_timeout(Duration::from_secs(2));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"secs\":2"));

        let parsed: CacheConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_missing_fields_use_defaults() {
        let parsed: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, CacheConfig::default());

        let parsed: CacheConfig =
            serde_json::from_str(r#"{"timeout": {"secs": 0, "nanos": 50000000}}"#).unwrap();
        assert_eq!(parsed.name, "value");
        assert_eq!(parsed.timeout(), Some(Duration::from_millis(50)));
    }

    #[test_case(Duration::from_micros(500) ; "sub-millisecond")]
    #[test_case(Duration::from_micros(1_900) ; "fractional millisecond")]
    #[test_case(Duration::from_nanos(1) ; "one nanosecond")]
    #[test_case(Duration::from_secs(3_600) ; "whole hour")]
    fn test_with_timeout_keeps_precision(timeout: Duration) {
        let config = CacheConfig::default().with_timeout(timeout);
        assert_eq!(config.timeout(), Some(timeout));

        let json = serde_json::to_string(&config).unwrap();
        let parsed: CacheConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.timeout(), Some(timeout));
    }

    // Each env test uses its own prefix since tests run in parallel.

    #[test]
    fn test_from_env_defaults_when_unset() {
        let config = CacheConfig::from_env("CLASSPROP_TEST_UNSET").unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_from_env_reads_variables() {
        env::set_var("CLASSPROP_TEST_SET_NAME", " registry ");
        env::set_var("CLASSPROP_TEST_SET_TIMEOUT_MS", "250");

        let config = CacheConfig::from_env("CLASSPROP_TEST_SET").unwrap();
        assert_eq!(config.name, "registry");
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_from_env_empty_timeout_is_unset() {
        env::set_var("CLASSPROP_TEST_EMPTY_TIMEOUT_MS", "");
        let config = CacheConfig::from_env("CLASSPROP_TEST_EMPTY").unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        env::set_var("CLASSPROP_TEST_BAD_TIMEOUT_MS", "0.1s");
        let err = CacheConfig::from_env("CLASSPROP_TEST_BAD").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("CLASSPROP_TEST_BAD_TIMEOUT_MS"));
    }
}
