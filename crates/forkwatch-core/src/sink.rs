//! Fork sinks — where reconstructed fork records are delivered.

use crate::types::ForkReport;

/// Receives structured records from chain monitors.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// monitor's own task between heights.
pub trait ForkSink: Send + Sync {
    /// A reconstructed fork with at least one replaced height.
    fn fork(&self, chain: &str, report: &ForkReport);

    /// The resolver hit the edge of the cache window before finding a common
    /// ancestor; `oldest_height` is the deepest height the walk reached.
    fn lookback_exceeded(&self, chain: &str, oldest_height: u64);
}

/// Default sink: structured tracing records, warn for forks and info for
/// truncated walks.
#[derive(Debug, Default)]
pub struct LogSink;

impl ForkSink for LogSink {
    fn fork(&self, chain: &str, report: &ForkReport) {
        let (Some(start), Some(end)) = (report.start(), report.end()) else {
            return;
        };
        tracing::warn!(
            chain,
            size = report.len(),
            truncated = report.truncated(),
            start_height = start.new.height,
            start_hash_new = %start.new.hash,
            start_hash_old = %start.old.hash,
            end_height = end.new.height,
            end_hash_new = %end.new.hash,
            end_hash_old = %end.old.hash,
            "fork detected"
        );
    }

    fn lookback_exceeded(&self, chain: &str, oldest_height: u64) {
        tracing::info!(chain, oldest_height, "fork depth exceeds lookback window");
    }
}
