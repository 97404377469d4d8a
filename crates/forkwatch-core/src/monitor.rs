//! Per-chain monitor — the sequential poll loop that drives fork detection.
//!
//! State machine: `Bootstrapping` (`next_height == 0`) → `Advancing` →
//! `Stopped`. A fixed-interval tick queries the remote head; every height
//! from the last appended one up to the head is then fetched and compared
//! against its cached predecessor, in strictly increasing order. A parent
//! hash mismatch hands the new header to the resolver.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{HeaderCache, DEFAULT_CAPACITY};
use crate::error::MonitorError;
use crate::pool::EndpointPool;
use crate::resolver::resolve_fork;
use crate::source::HeaderSource;
use crate::sink::{ForkSink, LogSink};
use crate::source::fetch_with_retry;

/// Tuning knobs for a single chain monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often to poll the remote head.
    pub poll_interval: Duration,
    /// Fixed delay between retries of a failed header fetch.
    pub retry_backoff: Duration,
    /// Header cache capacity — the fork lookback window.
    pub cache_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            retry_backoff: Duration::from_secs(1),
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Watches one chain for reorganizations.
///
/// Owns the chain's header cache and endpoint pool exclusively; all state
/// transitions happen on the task that calls [`ChainMonitor::run`].
pub struct ChainMonitor {
    name: String,
    config: MonitorConfig,
    pool: EndpointPool,
    cache: HeaderCache,
    /// Next height expected to extend the canonical view; 0 means the
    /// monitor has not yet observed the chain and will bootstrap from the
    /// remote head.
    next_height: u64,
    sink: Arc<dyn ForkSink>,
    shutdown: CancellationToken,
}

impl ChainMonitor {
    pub fn new(
        name: impl Into<String>,
        pool: EndpointPool,
        config: MonitorConfig,
        shutdown: CancellationToken,
    ) -> Self {
        let cache = HeaderCache::new(config.cache_capacity);
        Self {
            name: name.into(),
            config,
            pool,
            cache,
            next_height: 0,
            sink: Arc::new(LogSink),
            shutdown,
        }
    }

    /// Replace the default logging sink.
    pub fn with_sink(mut self, sink: Arc<dyn ForkSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Display name of the monitored chain.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run until shutdown is observed or an unrecoverable error occurs.
    /// Cancellation always completes cleanly with `Ok`.
    pub async fn run(mut self) -> Result<(), MonitorError> {
        let shutdown = self.shutdown.clone();
        let mut ticker = time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(chain = %self.name, "shutdown observed, stopping monitor");
                    return Ok(());
                }
                _ = ticker.tick() => match self.poll_once().await {
                    Ok(()) => {}
                    Err(MonitorError::Aborted) => {
                        info!(chain = %self.name, "shutdown observed, stopping monitor");
                        return Ok(());
                    }
                    Err(e) if e.is_transient() => {
                        warn!(chain = %self.name, error = %e, "poll failed, waiting for next tick");
                    }
                    Err(e) => return Err(e),
                },
            }
        }
    }

    /// One timer tick: query the head, then bootstrap or advance.
    ///
    /// A transient error here surfaces to [`ChainMonitor::run`], which logs
    /// it and waits for the next tick; no state changes on failure.
    async fn poll_once(&mut self) -> Result<(), MonitorError> {
        let head = self.pool.current_height().await?;

        if self.next_height == 0 {
            return self.bootstrap(head).await;
        }

        if head < self.next_height {
            // No new blocks this tick.
            return Ok(());
        }

        while self.next_height <= head {
            self.advance_one().await?;
        }
        Ok(())
    }

    /// First successful observation: seed the cache from the remote head.
    /// A failed fetch leaves the monitor bootstrapping until the next tick.
    async fn bootstrap(&mut self, head: u64) -> Result<(), MonitorError> {
        let header = self.pool.header_at(head).await?;
        info!(chain = %self.name, height = head, hash = %header.hash, "bootstrapped at chain head");
        self.cache.add(header);
        self.next_height = head + 1;
        Ok(())
    }

    /// Fetch and evaluate the header at `next_height`, then move past it.
    ///
    /// The fetch retries until it succeeds: a skipped height would break
    /// the parent-hash comparison for everything after it. The predecessor
    /// height must be cached; its absence means the lookback window failed
    /// to cover a gap and the chain's state can no longer be trusted.
    async fn advance_one(&mut self) -> Result<(), MonitorError> {
        let height = self.next_height;
        let header = fetch_with_retry(
            &self.pool,
            &self.name,
            height,
            self.config.retry_backoff,
            &self.shutdown,
        )
        .await?;

        let prev = self
            .cache
            .get(height - 1)
            .cloned()
            .ok_or(MonitorError::MissingPredecessor { height: height - 1 })?;

        if header.extends(&prev) {
            self.cache.add(header);
        } else {
            warn!(
                chain = %self.name,
                height = height - 1,
                old = %prev.hash,
                new = %header.parent_hash,
                "fork suspected"
            );
            let report = resolve_fork(
                &mut self.cache,
                &self.pool,
                &self.name,
                &header,
                self.config.retry_backoff,
                &self.shutdown,
            )
            .await?;
            if report.truncated() {
                let oldest = report.start().map_or(header.height, |p| p.old.height);
                self.sink.lookback_exceeded(&self.name, oldest);
            }
            if !report.is_empty() {
                self.sink.fork(&self.name, &report);
            }
        }
        self.next_height += 1;
        Ok(())
    }

    /// Test-only: place the monitor mid-advancement with a pre-filled cache.
    #[cfg(test)]
    pub(crate) fn seed(
        &mut self,
        next_height: u64,
        headers: impl IntoIterator<Item = crate::types::Header>,
    ) {
        for header in headers {
            self.cache.add(header);
        }
        self.next_height = next_height;
    }
}
