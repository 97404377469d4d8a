//! Error types for the monitoring pipeline.

use thiserror::Error;

/// Errors that can occur while monitoring a chain.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Transient RPC failure — logged and retried by the caller.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The cache no longer holds the height immediately below the one being
    /// appended. The monitor cannot compare parent hashes past this point.
    #[error("predecessor header at height {height} not found in cache")]
    MissingPredecessor { height: u64 },

    /// A pool was constructed with no endpoints.
    #[error("no endpoints configured for chain '{0}'")]
    NoEndpoints(String),

    /// Shutdown was observed while a retry was in flight.
    #[error("aborted by shutdown")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

impl MonitorError {
    /// Transient errors are retried; everything else stops the chain's task.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

/// Errors raised while loading the configuration file, before any
/// monitoring begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no chains configured")]
    NoChains,

    #[error("chain '{0}' has no endpoint URLs")]
    NoEndpoints(String),
}
