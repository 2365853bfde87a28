// ABOUTME: CLI for running one aggregation pass and printing the result as JSON.
// ABOUTME: Supports custom source files, seeded shuffling, and a per-source probe mode.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use newsdesk_scrape::{
    load_builtin_registry, AggregateRequest, Aggregator, SourceRegistry,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Aggregate headlines from configured news sources and print JSON.
#[derive(Parser, Debug)]
#[command(name = "newsdesk-cli")]
#[command(about = "Run one aggregation pass and print the items as JSON", long_about = None)]
struct Args {
    /// JSON file of source definitions (defaults to the builtin set)
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Distinct sources to query
    #[arg(short = 'k', long, default_value_t = 8)]
    sample: usize,

    /// Maximum items returned
    #[arg(long, default_value_t = 15)]
    limit: usize,

    /// Disable randomized source selection and output order
    #[arg(long)]
    no_shuffle: bool,

    /// Fixed RNG seed for reproducible selection and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Per-source fetch timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Probe every configured source and print per-source outcomes
    #[arg(long)]
    outcomes: bool,

    /// Output compact JSON instead of pretty
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Allow fetching from private/local networks
    #[arg(long)]
    allow_private_networks: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

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

    let aggregator = Aggregator::builder()
        .registry(registry)
        .timeout(Duration::from_secs(args.timeout_secs))
        .allow_private_networks(args.allow_private_networks)
        .build();

    let output = if args.outcomes {
        // Probe mode: attempt every configured source, report each outcome.
        let ids = aggregator.registry().ids().to_vec();
        let outcomes = aggregator.collect(&ids).await;
        let probed: Vec<_> = outcomes
            .iter()
            .map(|o| {
                json!({
                    "source": o.source,
                    "ok": o.error.is_none(),
                    "items": o.items.len(),
                    "error": o.error.as_ref().map(|e| e.to_string()),
                })
            })
            .collect();
        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        json!({
            "sources": probed,
            "total_sources": outcomes.len(),
            "failed": failed,
        })
    } else {
        let request = AggregateRequest {
            sources: args.sample,
            limit: args.limit,
            shuffle: !args.no_shuffle,
            seed: args.seed,
        };
        let items = aggregator.aggregate(&request).await?;
        serde_json::to_value(items)?
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");
    Ok(())
}
