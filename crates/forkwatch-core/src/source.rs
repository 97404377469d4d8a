//! The `HeaderSource` capability — how the monitor talks to a chain.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::MonitorError;
use crate::types::Header;

/// Remote chain queries the monitor depends on.
///
/// Implementations do not retry internally; retry policy belongs to the
/// caller. Must be `Send + Sync` so a pool can be shared across a task.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    /// Current tip height of the remote chain.
    async fn current_height(&self) -> Result<u64, MonitorError>;

    /// Full header at `height`.
    async fn header_at(&self, height: u64) -> Result<Header, MonitorError>;
}

/// Fetch the header at `height`, retrying failures at a fixed interval until
/// it succeeds or shutdown is observed.
///
/// The height is never skipped; sequential continuity requires every height
/// to be obtained eventually. Cancellation is checked before each attempt and
/// while sleeping, so shutdown latency is bounded by one backoff interval.
pub(crate) async fn fetch_with_retry(
    source: &dyn HeaderSource,
    chain: &str,
    height: u64,
    backoff: Duration,
    shutdown: &CancellationToken,
) -> Result<Header, MonitorError> {
    loop {
        if shutdown.is_cancelled() {
            return Err(MonitorError::Aborted);
        }
        match source.header_at(height).await {
            Ok(header) => return Ok(header),
            Err(e) => {
                tracing::warn!(chain, height, error = %e, "header fetch failed, retrying");
                tokio::select! {
                    _ = shutdown.cancelled() => return Err(MonitorError::Aborted),
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
    }
}
