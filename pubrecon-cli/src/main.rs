//! Publish result reconciliation runner.
//!
//! Reconciles one publish batch against a JSON snapshot of the stores the
//! job touched and prints the resulting changed items as JSON.
//!
//! Usage:
//!   pubrecon --fixture stores.json --batch batch.json
//!
//! Logs go to stderr so stdout only carries the notification payload.

use std::{path::PathBuf, sync::Arc};
use anyhow::Result;
use clap::Parser;
use pubrecon_cli::{run, JsonSink};
use pubrecon_reconcile::{NotificationStatus, ReconcilerConfig, DEFAULT_MAX_CONCURRENCY};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pubrecon")]
#[command(about = "Reconcile publish results into changed items")]
struct Args {
    /// JSON snapshot of the source, target and historical stores
    #[arg(short, long)]
    fixture: PathBuf,

    /// JSON publish batch to reconcile
    #[arg(short, long)]
    batch: PathBuf,

    /// Maximum number of entities reconciled concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = ReconcilerConfig {
        max_concurrency: args.max_concurrency,
    };
    let outcome = run(&args.fixture, &args.batch, config, Arc::new(JsonSink::stdout())).await?;
    let report = &outcome.report;

    info!(
        "Resolved {} of {} results ({} dropped)",
        report.resolved(),
        report.total,
        report.dropped()
    );
    for id in &report.multi_variance {
        warn!("Item {} changed in several variants; only the first was reported", id);
    }
    for failed in &report.failed {
        warn!("Item {} could not be looked up: {}", failed.entity_id, failed.error);
    }
    if let NotificationStatus::Failed(reason) = &report.notification {
        warn!("Writing changed items failed: {}", reason);
    }

    Ok(())
}
