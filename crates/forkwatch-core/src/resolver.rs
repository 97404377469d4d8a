//! Divergence reconstruction — the backward walk that determines a fork's
//! extent once a parent-hash mismatch has been observed.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::cache::HeaderCache;
use crate::error::MonitorError;
use crate::source::{fetch_with_retry, HeaderSource};
use crate::types::{ForkPair, ForkReport, Header};

/// Walk backward from `tip` — a freshly fetched header whose parent hash
/// disagrees with the cached header one height below — until the old and new
/// views agree again.
///
/// Each iteration compares the cached ("old") header below the cursor
/// against the cursor's parent hash:
///
/// - cache miss: the divergence predates the lookback window; the report is
///   marked truncated and keeps the partial path,
/// - hashes agree: the common ancestor was found and the path is complete,
/// - hashes disagree: the new chain's actual header at that height is
///   fetched (fixed-backoff retry, since a consistent view must eventually
///   be obtained), recorded as a [`ForkPair`], cached in place of the stale
///   entry, and made the new cursor.
///
/// If the freshly fetched header matches neither the cursor's parent hash
/// nor the cached hash, the chain moved again mid-walk; matching the cached
/// hash means the view converged back onto what we already had, which ends
/// the walk. Termination is guaranteed because the cursor height strictly
/// decreases, bounded by height 0 or cache exhaustion.
///
/// The passed-in `tip` is re-cached at its own height regardless of outcome,
/// preserving the poll loop's invariant that the height below the one being
/// appended is always cached. The only error is [`MonitorError::Aborted`],
/// raised when shutdown interrupts an in-flight retry.
pub async fn resolve_fork(
    cache: &mut HeaderCache,
    source: &dyn HeaderSource,
    chain: &str,
    tip: &Header,
    backoff: Duration,
    shutdown: &CancellationToken,
) -> Result<ForkReport, MonitorError> {
    let mut pairs: Vec<ForkPair> = Vec::new();
    let mut truncated = false;
    let mut cursor = tip.clone();

    loop {
        let Some(prev_height) = cursor.height.checked_sub(1) else {
            // Genesis has no parent to compare; treat like window exhaustion.
            truncated = true;
            break;
        };
        let Some(old) = cache.get(prev_height).cloned() else {
            truncated = true;
            break;
        };
        if old.hash == cursor.parent_hash {
            // Common ancestor found.
            break;
        }
        let replacement =
            match fetch_with_retry(source, chain, prev_height, backoff, shutdown).await {
                Ok(header) => header,
                Err(e) => {
                    cache.add(tip.clone());
                    return Err(e);
                }
            };
        if replacement.hash != cursor.parent_hash && replacement.hash == old.hash {
            // The chain moved again mid-walk and converged back onto the
            // view we already hold.
            break;
        }
        pairs.push(ForkPair { old, new: replacement.clone() });
        cache.add(replacement.clone());
        cursor = replacement;
    }

    cache.add(tip.clone());
    Ok(ForkReport::new(pairs, truncated))
}
