//! forkwatch-core — per-chain polling and fork (reorg) detection engine.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator → N × ChainMonitor   (one Tokio task per chain)
//!                     ├── HeaderCache   (bounded LRU lookback window)
//!                     ├── EndpointPool  (random per-call endpoint selection)
//!                     └── resolve_fork  (backward divergence walk)
//!                               ↓
//!                          ForkSink (structured fork records)
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod pool;
pub mod resolver;
pub mod sink;
pub mod source;
pub mod types;

pub use cache::HeaderCache;
pub use config::{ChainConfig, ChainKind, Config};
pub use error::{ConfigError, MonitorError};
pub use monitor::{ChainMonitor, MonitorConfig};
pub use orchestrator::Orchestrator;
pub use pool::EndpointPool;
pub use resolver::resolve_fork;
pub use sink::{ForkSink, LogSink};
pub use source::HeaderSource;
pub use types::{ForkPair, ForkReport, Header};
