// ABOUTME: Binary entry point for the newsdesk HTTP service.
// ABOUTME: Parses CLI options, builds the engine, and serves the router.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use newsdesk_scrape::{
    load_builtin_registry, precompile_selectors, AggregateRequest, Aggregator, SourceRegistry,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use newsdesk_server::{routes, AppState};

#[derive(Parser, Debug)]
#[command(name = "newsdesk-server")]
#[command(about = "Serve aggregated headlines from configured news sources")]
struct Args {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Bind port
    #[arg(long, default_value_t = 7860)]
    port: u16,

    /// JSON file of source definitions (defaults to the builtin set)
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Per-source fetch timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Distinct sources queried per request
    #[arg(long, default_value_t = 8)]
    sample: usize,

    /// Maximum items returned per request
    #[arg(long, default_value_t = 15)]
    limit: usize,

    /// Disable randomized source selection and output order
    #[arg(long)]
    no_shuffle: bool,

    /// Allow fetching from private/local networks
    #[arg(long)]
    allow_private_networks: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let registry = match &args.sources {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read sources file {}", path.display()))?;
            SourceRegistry::from_json(&raw)
                .with_context(|| format!("invalid sources file {}", path.display()))?
        }
        None => load_builtin_registry(),
    };
    info!(sources = registry.len(), "source registry loaded");
    precompile_selectors(registry.rule_selectors());

    let aggregator = Aggregator::builder()
        .registry(registry)
        .timeout(Duration::from_secs(args.timeout_secs))
        .allow_private_networks(args.allow_private_networks)
        .build();
    let request = AggregateRequest {
        sources: args.sample,
        limit: args.limit,
        shuffle: !args.no_shuffle,
        seed: None,
    };

    let app = routes(AppState::new(aggregator, request));
    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "newsdesk-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
