//! forkwatch — multi-chain fork (reorg) monitor.
//!
//! Loads a JSON config describing the chains to watch, starts one monitor
//! task per chain, and emits structured fork records until terminated.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use forkwatch_core::{
    ChainConfig, ChainKind, ChainMonitor, Config, EndpointPool, HeaderSource, Orchestrator,
};
use forkwatch_evm::EvmEndpoint;

#[derive(Debug, Parser)]
#[command(name = "forkwatch", version, about = "Multi-chain fork (reorg) monitor")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = "./config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let shutdown = CancellationToken::new();
    let mut orchestrator = Orchestrator::new(shutdown.clone());
    for chain in &config.chains {
        orchestrator.add(build_monitor(chain, shutdown.clone())?);
        info!(chain = %chain.name, endpoints = chain.urls.len(), "chain monitor configured");
    }

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    orchestrator.run().await?;
    Ok(())
}

/// Construct the monitor for one configured chain. Each [`ChainKind`]
/// variant maps to one endpoint constructor.
fn build_monitor(chain: &ChainConfig, shutdown: CancellationToken) -> Result<ChainMonitor> {
    let endpoints: Vec<Arc<dyn HeaderSource>> = match chain.kind {
        ChainKind::Evm => chain
            .urls
            .iter()
            .map(|url| EvmEndpoint::new(url).map(|e| Arc::new(e) as Arc<dyn HeaderSource>))
            .collect::<Result<_, _>>()?,
    };
    let pool = EndpointPool::new(&chain.name, endpoints)?;
    Ok(ChainMonitor::new(
        &chain.name,
        pool,
        chain.monitor_config(),
        shutdown,
    ))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                () = std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
