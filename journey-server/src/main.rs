use std::sync::Arc;

use clap::Parser;
use journey_core::JourneyConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use journey_server::http::{self, HttpState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "journey.toml")]
    config: String,

    /// Load config and journey data, report status, and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match JourneyConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging (RUST_LOG wins over [service] log_level)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    let state = HttpState::bootstrap(config).await?;

    if args.check {
        if state.data_available {
            println!(
                "✅ Journey data loaded: {} entries from {}",
                state.store.len(),
                state.config.data.timeline_path
            );
        } else {
            println!(
                "⚠️  Journey data unavailable at {} (dashboard will show empty state)",
                state.config.data.timeline_path
            );
        }
        println!("✅ Decision explainer: {}", state.explainer.backend_name());
        println!("✅ User id: {}", state.user_id);
        return Ok(());
    }

    if !state.config.http.enabled {
        tracing::warn!("HTTP API disabled in config; nothing to serve");
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(Arc::new(state), tx.subscribe()).await?;

    Ok(())
}
