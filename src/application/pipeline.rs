//! Pipeline orchestrator
//!
//! Drives list discovery once, then the detail protocol once per discovered
//! pair, strictly sequentially over the single browser tab. Soft failures
//! never block the loop; the fatal discovery error aborts the run before
//! any output exists; a browser that dies mid-loop stops the loop but the
//! partial accumulation is still flattened and written.

use super::detail::{DetailExtractor, DetailOutcome};
use super::listing::ListDiscovery;
use crate::domain::accumulation::WalletLedger;
use crate::domain::model::{RunSummary, SkipReason};
use crate::infrastructure::browser::{BrowserSession, SessionError};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::extraction::{ExtractError, ExtractResult};
use crate::infrastructure::sink::{OutputSink, SinkError};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Output schema: column order and header titles of the CSV
pub const OUTPUT_SCHEMA: &[(&str, &str)] =
    &[("coin", "Coin Name"), ("wallet_address", "Wallet Address")];

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The index page yielded zero rows; nothing was written
    #[error("trending list discovery failed: {0}")]
    Discovery(ExtractError),

    /// The session failed before any pair was processed
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Observable states of a run, logged at each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    ListLoaded,
    Navigating,
    Extracting,
    Accumulated,
    Done,
    Aborted,
}

pub struct TrendingPipeline {
    discovery: ListDiscovery,
    detail: DetailExtractor,
    sink: Box<dyn OutputSink>,
    csv_path: PathBuf,
    item_delay: Duration,
}

impl TrendingPipeline {
    pub fn new(config: &AppConfig, sink: Box<dyn OutputSink>) -> ExtractResult<Self> {
        let snapshot_dir = Path::new(&config.output.snapshot_dir);
        Ok(Self {
            discovery: ListDiscovery::new(
                &config.selectors.trending_list,
                &config.pipeline,
                snapshot_dir,
            )?,
            detail: DetailExtractor::new(
                &config.selectors.trader_table,
                &config.pipeline,
                snapshot_dir,
            )?,
            sink,
            csv_path: PathBuf::from(&config.output.csv_path),
            item_delay: config.pipeline.item_delay(),
        })
    }

    pub async fn run(&self, session: &dyn BrowserSession) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let mut stage = PipelineStage::Init;

        let pairs = match self.discovery.discover(session).await {
            Ok(pairs) => pairs,
            Err(e) => {
                advance(&mut stage, PipelineStage::Aborted);
                if let PipelineError::Discovery(ref cause) = e {
                    error!(error = %cause, "aborting run, capturing diagnostic snapshot");
                    if let Err(snap_err) = session
                        .screenshot(self.discovery.failure_snapshot_path())
                        .await
                    {
                        warn!(error = %snap_err, "diagnostic snapshot failed");
                    }
                }
                return Err(e);
            }
        };
        advance(&mut stage, PipelineStage::ListLoaded);

        let mut ledger = WalletLedger::new();
        let mut extracted = 0usize;
        let mut skipped = 0usize;

        for (index, pair) in pairs.iter().enumerate() {
            if !pair.has_detail_url() {
                warn!(pair = %pair.name, reason = %SkipReason::MissingUrl, "skipping pair");
                skipped += 1;
                continue;
            }

            advance(&mut stage, PipelineStage::Navigating);
            info!(pair = %pair.name, url = %pair.detail_url, "fetching top traders");

            advance(&mut stage, PipelineStage::Extracting);
            match self.detail.extract(session, pair).await {
                Ok(DetailOutcome::Extracted(wallets)) => {
                    info!(pair = %pair.name, wallets = wallets.len(), "pair extracted");
                    ledger.append(&pair.name, wallets);
                    extracted += 1;
                    advance(&mut stage, PipelineStage::Accumulated);
                }
                Ok(DetailOutcome::Skipped(reason)) => {
                    warn!(pair = %pair.name, reason = %reason, "pair skipped");
                    skipped += 1;
                }
                Err(fatal) => {
                    // the session is gone; keep what was accumulated so far
                    error!(error = %fatal, "browser session lost mid-run, flushing partial results");
                    break;
                }
            }

            // politeness delay between pair visits, not after the last one
            if index + 1 < pairs.len() {
                tokio::time::sleep(self.item_delay).await;
            }
        }
        advance(&mut stage, PipelineStage::Done);

        let records = ledger.flatten();
        self.sink.write(&self.csv_path, OUTPUT_SCHEMA, &records)?;

        let summary = RunSummary {
            pairs_discovered: pairs.len(),
            pairs_extracted: extracted,
            pairs_skipped: skipped,
            records_written: records.len(),
            finished_at: chrono::Utc::now(),
        };
        info!(
            pairs = summary.pairs_discovered,
            extracted = summary.pairs_extracted,
            skipped = summary.pairs_skipped,
            records = summary.records_written,
            elapsed = ?started.elapsed(),
            output = %self.csv_path.display(),
            "run complete"
        );
        Ok(summary)
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!(from = ?stage, to = ?next, "pipeline stage");
    *stage = next;
}
