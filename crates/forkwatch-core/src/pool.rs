//! Per-chain endpoint pool with uniform random per-call selection.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;

use crate::error::MonitorError;
use crate::source::HeaderSource;
use crate::types::Header;

/// The set of configured RPC endpoints for one chain.
///
/// Every call picks one endpoint uniformly at random, spreading load and
/// tolerating a single bad endpoint. Selection is never sticky: consecutive
/// calls in the same resolution may hit different endpoints, and the
/// resolver is written to be correct under that assumption.
pub struct EndpointPool {
    endpoints: Vec<Arc<dyn HeaderSource>>,
}

impl std::fmt::Debug for EndpointPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointPool")
            .field("endpoints", &self.endpoints.len())
            .finish()
    }
}

impl EndpointPool {
    /// Build a pool for `chain`. A pool with zero endpoints is a
    /// misconfiguration and is rejected here, before monitoring starts.
    pub fn new(
        chain: &str,
        endpoints: Vec<Arc<dyn HeaderSource>>,
    ) -> Result<Self, MonitorError> {
        if endpoints.is_empty() {
            return Err(MonitorError::NoEndpoints(chain.to_string()));
        }
        Ok(Self { endpoints })
    }

    /// Number of endpoints in the pool.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always `false` — construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    fn pick(&self) -> &Arc<dyn HeaderSource> {
        let idx = rand::rng().random_range(0..self.endpoints.len());
        &self.endpoints[idx]
    }
}

#[async_trait]
impl HeaderSource for EndpointPool {
    async fn current_height(&self) -> Result<u64, MonitorError> {
        self.pick().current_height().await
    }

    async fn header_at(&self, height: u64) -> Result<Header, MonitorError> {
        self.pick().header_at(height).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct Counting {
        calls: AtomicU32,
        height: u64,
    }

    #[async_trait]
    impl HeaderSource for Counting {
        async fn current_height(&self) -> Result<u64, MonitorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.height)
        }

        async fn header_at(&self, height: u64) -> Result<Header, MonitorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Header {
                height,
                hash: format!("0x{height}"),
                parent_hash: format!("0x{}", height - 1),
            })
        }
    }

    fn counting(height: u64) -> Arc<Counting> {
        Arc::new(Counting { calls: AtomicU32::new(0), height })
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = EndpointPool::new("eth", vec![]).unwrap_err();
        assert!(matches!(err, MonitorError::NoEndpoints(chain) if chain == "eth"));
    }

    #[tokio::test]
    async fn delegates_to_an_endpoint() {
        let endpoint = counting(123);
        let pool = EndpointPool::new("eth", vec![endpoint.clone()]).unwrap();
        assert_eq!(pool.current_height().await.unwrap(), 123);
        let header = pool.header_at(50).await.unwrap();
        assert_eq!(header.height, 50);
        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn selection_spreads_across_endpoints() {
        let a = counting(1);
        let b = counting(1);
        let pool = EndpointPool::new("eth", vec![a.clone(), b.clone()]).unwrap();
        for _ in 0..200 {
            pool.current_height().await.unwrap();
        }
        // With uniform selection, 200 calls all landing on one endpoint has
        // probability 2^-199; both must have been hit.
        assert!(a.calls.load(Ordering::SeqCst) > 0);
        assert!(b.calls.load(Ordering::SeqCst) > 0);
        assert_eq!(
            a.calls.load(Ordering::SeqCst) + b.calls.load(Ordering::SeqCst),
            200
        );
    }
}
