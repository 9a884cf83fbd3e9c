//! Mythos Arbiter entry point.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mythos_arbiter::config::{self, ArbiterConfig};
use mythos_arbiter::scoring::{JsonFileStore, WeightStore};
use mythos_arbiter::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "mythos-arbiter", about = "Adaptive arbiter for a flaky model endpoint")]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mythos_arbiter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("mythos-arbiter v0.4.0 starting");

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ArbiterConfig::default(),
    };
    config::apply_env_overrides(&mut config);
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    config::validate_config(&config)?;

    tracing::info!(
        bind_address = %config.server.bind_address,
        model_url = %config.model.url,
        max_retries = config.model.max_retries,
        request_timeout_secs = config.model.request_timeout_secs,
        ema_alpha = config.scoring.ema_alpha,
        "Configuration loaded"
    );

    // Persistence unavailability is startup-blocking: the stored row is the
    // single authoritative calibration state.
    let mut store = JsonFileStore::new(&config.scoring.state_path);
    let row = store.load()?;
    tracing::info!(
        path = %store.path().display(),
        w_coherence = row.w_coherence,
        w_grounding = row.w_grounding,
        w_illumination = row.w_illumination,
        "Weight state ready"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, Box::new(store));
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
