//! dex-top-traders - trending-pair top trader collection pipeline
//!
//! Extracts the ranked trending pairs from a DEX listing index page, visits
//! each pair's detail page, activates the trader tab and collects the
//! wallet addresses into one CSV file.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{DetailOutcome, PipelineError, TrendingPipeline, OUTPUT_SCHEMA};
pub use domain::{PairListing, RunSummary, SkipReason, TraderRecord, WalletLedger};
pub use infrastructure::{AppConfig, BrowserSession, ChromeSession, CsvSink};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load configuration, launch the browser and execute one full run
///
/// The CSV named in the configuration is the run's sole artifact; the exit
/// path through `Err` covers the fatal discovery case, which writes nothing.
pub async fn run() -> Result<RunSummary> {
    let config = AppConfig::load()?;
    infrastructure::init_logging(Path::new(&config.output.log_dir))?;

    let session =
        ChromeSession::launch(&config.browser).context("failed to launch browser session")?;
    let pipeline = TrendingPipeline::new(&config, Box::new(CsvSink))
        .context("failed to assemble pipeline")?;

    let outcome = pipeline.run(&session).await;
    if let Err(e) = session.close().await {
        info!(error = %e, "session close reported an error");
    }

    let summary = outcome.context("pipeline run failed")?;
    if let Ok(json) = serde_json::to_string(&summary) {
        info!(summary = %json, "run summary");
    }
    Ok(summary)
}
