//! Live order-book depth feed. Entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Multi-venue order-book depth ingestion and aggregation.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via BOOKDEPTH_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // TLS crypto provider must be installed before any WS connections.
    bookdepth_ws::init_crypto();

    let args = Args::parse();

    bookdepth_viz::logging::init_logging();

    info!("Starting bookdepth v{}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config
        .or_else(|| std::env::var("BOOKDEPTH_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        info!(config_path = %config_path, "Loading configuration");
        bookdepth_viz::AppConfig::from_file(&config_path)?
    } else {
        info!(config_path = %config_path, "Config file not found, using defaults");
        bookdepth_viz::AppConfig::default()
    };
    info!(venue = %config.venue, coin = %config.coin, mode = ?config.mode, "Configuration loaded");

    let mut app = bookdepth_viz::Application::new(config);
    app.run().await?;

    Ok(())
}
