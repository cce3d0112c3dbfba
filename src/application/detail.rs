//! Detail-page protocol
//!
//! For one pair: navigate, find the trader tab by its visible label,
//! activate it, wait (bounded, retry-once) for the trader table to
//! materialize, then parse the wallet addresses out of it.
//!
//! Activation and content readiness are verified separately: a successful
//! click proves nothing about the table, which renders from its own fetch.
//! Every failure here is soft — the pair is skipped and the pipeline moves
//! on — except a dead browser session, which is the caller's problem.

use super::waits::bounded_wait;
use crate::domain::model::{PairListing, SkipReason};
use crate::infrastructure::browser::{BrowserSession, SessionError, WaitPolicy};
use crate::infrastructure::config::{PipelineConfig, WaitPoint};
use crate::infrastructure::extraction::{
    ExtractResult, PageParser, ParseContext, TraderTableParser, TraderTableSelectors,
};
use scraper::Html;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Result of one detail-page visit
#[derive(Debug)]
pub enum DetailOutcome {
    /// Non-empty-filtered wallets in page order, possibly zero of them
    Extracted(Vec<String>),
    /// The pair contributed nothing; the reason is logged by the pipeline
    Skipped(SkipReason),
}

pub struct DetailExtractor {
    parser: TraderTableParser,
    table_selector: String,
    tab_label: String,
    table_wait: WaitPoint,
    settle_delay: Duration,
    snapshot_path: PathBuf,
}

impl DetailExtractor {
    pub fn new(
        selectors: &TraderTableSelectors,
        config: &PipelineConfig,
        snapshot_dir: &Path,
    ) -> ExtractResult<Self> {
        Ok(Self {
            parser: TraderTableParser::with_catalog(selectors)?,
            table_selector: selectors.primary_container_selector().to_string(),
            tab_label: config.traders_tab_label.clone(),
            table_wait: config.table_wait.clone(),
            settle_delay: config.settle_delay(),
            snapshot_path: snapshot_dir.join("traders-table-timeout.png"),
        })
    }

    /// Run the protocol for one pair
    ///
    /// `Err` only for fatal session errors; every per-pair condition comes
    /// back as [`DetailOutcome::Skipped`].
    pub async fn extract(
        &self,
        session: &dyn BrowserSession,
        pair: &PairListing,
    ) -> Result<DetailOutcome, SessionError> {
        if let Err(e) = session
            .navigate(&pair.detail_url, WaitPolicy::NetworkIdle)
            .await
        {
            return self.soft_fail(e, SkipReason::NavigationTimeout("detail page".into()));
        }

        let control = match session.find_control_by_label(&self.tab_label).await? {
            Some(control) => control,
            None => {
                return Ok(DetailOutcome::Skipped(SkipReason::ControlNotFound(
                    self.tab_label.clone(),
                )));
            }
        };

        if let Err(e) = session.activate(&control).await {
            return self.soft_fail(e, SkipReason::ControlNotFound(self.tab_label.clone()));
        }
        tokio::time::sleep(self.settle_delay).await;

        let materialized = bounded_wait(
            session,
            &self.table_selector,
            &self.table_wait,
            &self.snapshot_path,
        )
        .await?;
        if !materialized {
            return Ok(DetailOutcome::Skipped(SkipReason::NavigationTimeout(
                "trader table did not materialize".into(),
            )));
        }

        let content = session.content().await?;
        let document = Html::parse_document(&content);
        let context = ParseContext::new(&pair.detail_url, &pair.name);

        let wallets = match self.parser.parse(&document, &context) {
            Ok(wallets) => wallets,
            Err(e) => {
                warn!(pair = %pair.name, error = %e, "trader table parse failed");
                Vec::new()
            }
        };

        debug!(pair = %pair.name, wallets = wallets.len(), "detail extraction finished");
        Ok(DetailOutcome::Extracted(wallets))
    }

    /// Fatal session errors propagate; anything else becomes a skip
    fn soft_fail(
        &self,
        error: SessionError,
        reason: SkipReason,
    ) -> Result<DetailOutcome, SessionError> {
        if error.is_fatal() {
            return Err(error);
        }
        warn!(error = %error, "detail step failed, skipping pair");
        Ok(DetailOutcome::Skipped(match reason {
            SkipReason::NavigationTimeout(_) => SkipReason::NavigationTimeout(error.to_string()),
            other => other,
        }))
    }
}
