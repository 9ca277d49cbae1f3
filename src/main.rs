//! Agent wallet service.
//!
//! ```text
//!   agent ──HTTP──▶ http ──▶ planner ──▶ plan store
//!                     │                     ▲
//!                     └────▶ executor ──────┘
//!                               │
//!                               ▼
//!                            signer (mock | env | vault) ──▶ chain
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use agent_wallet::config::load_or_default;
use agent_wallet::http::{AppState, HttpServer};
use agent_wallet::lifecycle::{run_expiry_sweeper, signals, Shutdown};
use agent_wallet::observability::{logging, metrics};
use agent_wallet::signer::{Signer, SignerBackend};
use agent_wallet::store::Stores;
use agent_wallet::tx::{TxExecutor, TxPlanner};

#[derive(Parser)]
#[command(name = "agent-wallet")]
#[command(about = "Transaction planner and executor for agent wallets", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "AGENT_WALLET_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("agent-wallet v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        signer = %config.signer.kind,
        plan_ttl_secs = config.planner.plan_ttl_secs,
        persistent = config.store.persistence_path.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let signer: Arc<dyn Signer> = Arc::new(SignerBackend::from_config(&config.signer)?);
    let stores = Stores::open(&config.store)?;
    let planner = TxPlanner::new(stores.plans.clone(), config.planner.clone());
    let executor = TxExecutor::new(stores.plans.clone(), stores.receipts.clone());

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let sweeper = (config.store.cleanup_interval_secs > 0).then(|| {
        tokio::spawn(run_expiry_sweeper(
            planner.clone(),
            stores.clone(),
            Duration::from_secs(config.store.cleanup_interval_secs),
            shutdown.subscribe(),
        ))
    });

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let state = AppState {
        planner,
        executor,
        signer,
    };
    HttpServer::new(config.server.clone(), state)
        .run(listener, shutdown.subscribe())
        .await?;

    match sweeper {
        Some(handle) => {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Expiry sweeper panicked");
            }
        }
        None => stores.flush()?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
