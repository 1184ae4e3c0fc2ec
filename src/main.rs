//! BusChat Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Loaded from a TOML file (see `--config`) with environment overrides:
//! - `BUSCHAT_HOST` / `BUSCHAT_PORT`: bind address
//! - `BUS_API_KEY`: transit agency API key
//! - `RTPIDATAFEED`: data feed name (default: bustime)
//! - `BUSCHAT_LANG`: reply language, "en" or "es"
//! - `MESSAGE_LIMIT`: SMS interactions per sender per hour
//! - `BUSCHAT_LOG_LEVEL` / `BUSCHAT_LOG_FORMAT`: logging
//! - `RUST_LOG`: full tracing filter, wins over the config level

use buschat::bustime::{BusTimeClient, BusTimeConfig, Lang};
use buschat::config::{generate_default_config, Config};
use buschat::ratelimit::{RateLimitConfig, RateLimiter};
use buschat::web::{serve, AppState, WebConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bus arrival predictions over web chat and SMS
#[derive(Debug, Parser)]
#[command(name = "buschat", version)]
struct Cli {
    /// Path to a TOML config file (default: standard locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,

    /// Print a commented default config file and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);

    tracing::info!("Starting BusChat v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Prediction feed: {}", config.bustime.base_url);
    if config.bustime.api_key.is_empty() {
        tracing::warn!("BUS_API_KEY is not set; upstream requests will be rejected");
    }

    let client = Arc::new(BusTimeClient::new(BusTimeConfig {
        base_url: config.bustime.base_url.clone(),
        api_key: config.bustime.api_key.clone(),
        data_feed: config.bustime.data_feed.clone(),
        request_timeout_ms: config.bustime.request_timeout_ms,
        max_predictions: config.bustime.max_predictions,
    })?);

    let limiter = RateLimiter::new(RateLimitConfig {
        message_limit: config.ratelimit.message_limit,
        window_minutes: config.ratelimit.window_minutes,
        allowlist: config.ratelimit.allowlist.clone(),
    });

    let lang = Lang::from_code(&config.chat.language);
    let web_config = WebConfig::new(config.server.host.clone(), config.server.port);

    let state = AppState::new(client, limiter, lang);

    serve(state, &web_config).await?;

    tracing::info!("BusChat stopped");
    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "buschat={},tower_http=info",
            config.logging.level
        ))
    });

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
