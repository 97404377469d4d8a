//! Configuration file loading and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CAPACITY;
use crate::error::ConfigError;
use crate::monitor::MonitorConfig;

/// Supported chain families.
///
/// A closed set: adding a family means adding a variant here and a
/// constructor arm in the binary, not patching a type tag at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    Evm,
}

/// One monitored chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub kind: ChainKind,
    /// Display name used in logs and fork records.
    pub name: String,
    /// Candidate RPC endpoints; one is chosen at random per call.
    pub urls: Vec<String>,
    /// Poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Fixed retry backoff in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Header cache capacity — the fork lookback window.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl ChainConfig {
    /// Monitor tuning derived from this chain's settings.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            cache_capacity: self.cache_capacity,
        }
    }
}

/// Top-level process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chains: Vec<ChainConfig>,
}

impl Config {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        let config: Config = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject misconfiguration before any monitoring begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::NoChains);
        }
        for chain in &self.chains {
            if chain.urls.is_empty() {
                return Err(ConfigError::NoEndpoints(chain.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "chains": [
                    { "kind": "evm", "name": "eth", "urls": ["http://localhost:8545"] }
                ]
            }"#,
        )
        .unwrap();
        config.validate().unwrap();

        let chain = &config.chains[0];
        assert_eq!(chain.kind, ChainKind::Evm);
        assert_eq!(chain.poll_interval_ms, 2000);
        assert_eq!(chain.retry_backoff_ms, 1000);
        assert_eq!(chain.cache_capacity, DEFAULT_CAPACITY);

        let monitor = chain.monitor_config();
        assert_eq!(monitor.poll_interval, Duration::from_secs(2));
        assert_eq!(monitor.retry_backoff, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_honored() {
        let config: Config = serde_json::from_str(
            r#"{
                "chains": [
                    {
                        "kind": "evm",
                        "name": "fastchain",
                        "urls": ["http://a", "http://b"],
                        "poll_interval_ms": 500,
                        "retry_backoff_ms": 250,
                        "cache_capacity": 64
                    }
                ]
            }"#,
        )
        .unwrap();
        let chain = &config.chains[0];
        assert_eq!(chain.urls.len(), 2);
        assert_eq!(chain.poll_interval_ms, 500);
        assert_eq!(chain.cache_capacity, 64);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Config, _> = serde_json::from_str(
            r#"{ "chains": [ { "kind": "carrier-pigeon", "name": "x", "urls": ["http://a"] } ] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_endpoints_is_rejected() {
        let config: Config = serde_json::from_str(
            r#"{ "chains": [ { "kind": "evm", "name": "eth", "urls": [] } ] }"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NoEndpoints(name) if name == "eth"));
    }

    #[test]
    fn zero_chains_is_rejected() {
        let config: Config = serde_json::from_str(r#"{ "chains": [] }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::NoChains)));
    }
}
