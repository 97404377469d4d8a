//! Fans all chain monitors into a single cancellable run.

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::MonitorError;
use crate::monitor::ChainMonitor;

/// Runs one task per configured chain, all sharing one shutdown token.
pub struct Orchestrator {
    shutdown: CancellationToken,
    monitors: Vec<ChainMonitor>,
}

impl Orchestrator {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            monitors: Vec::new(),
        }
    }

    pub fn add(&mut self, monitor: ChainMonitor) {
        self.monitors.push(monitor);
    }

    /// Run every monitor to completion.
    ///
    /// The first unrecoverable failure cancels the shared token — stopping
    /// every other chain within about one poll interval — and becomes the
    /// run's error. Plain cancellation completes with `Ok` once all tasks
    /// have stopped.
    pub async fn run(self) -> Result<(), MonitorError> {
        let mut tasks = JoinSet::new();
        for monitor in self.monitors {
            let name = monitor.name().to_string();
            tasks.spawn(async move { (name, monitor.run().await) });
        }

        let mut first_err = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(()))) => {
                    info!(chain = %name, "monitor stopped");
                }
                Ok((name, Err(e))) => {
                    error!(chain = %name, error = %e, "monitor failed, shutting down all chains");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                    self.shutdown.cancel();
                }
                Err(e) => {
                    error!(error = %e, "monitor task panicked, shutting down all chains");
                    if first_err.is_none() {
                        first_err = Some(MonitorError::Other(e.to_string()));
                    }
                    self.shutdown.cancel();
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
