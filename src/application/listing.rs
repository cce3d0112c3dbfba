//! List discovery stage
//!
//! Navigates the trending index once, waits for the rows to render and
//! parses the ranked pair descriptors. An index page with zero rows is a
//! hard failure surfaced to the pipeline; this stage never converts it into
//! an empty work list.

use super::pipeline::PipelineError;
use super::waits::bounded_wait;
use crate::domain::model::PairListing;
use crate::infrastructure::browser::{BrowserSession, WaitPolicy};
use crate::infrastructure::config::{PipelineConfig, WaitPoint};
use crate::infrastructure::extraction::{
    ExtractResult, PageParser, ParseContext, TrendingListParser, TrendingListSelectors,
};
use scraper::Html;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

pub struct ListDiscovery {
    parser: TrendingListParser,
    index_url: String,
    base_url: String,
    row_selector: String,
    wait: WaitPoint,
    snapshot_path: PathBuf,
}

impl ListDiscovery {
    pub fn new(
        selectors: &TrendingListSelectors,
        config: &PipelineConfig,
        snapshot_dir: &Path,
    ) -> ExtractResult<Self> {
        // relative row links resolve against the index page's origin
        let base_url = Url::parse(&config.index_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_else(|_| config.index_url.clone());

        Ok(Self {
            parser: TrendingListParser::with_catalog(selectors)?,
            index_url: config.index_url.clone(),
            base_url,
            row_selector: selectors.primary_row_selector().to_string(),
            wait: config.list_wait.clone(),
            snapshot_path: snapshot_dir.join("trending-list-failure.png"),
        })
    }

    /// Path the pipeline snapshots to when discovery fails hard
    pub fn failure_snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub async fn discover(
        &self,
        session: &dyn BrowserSession,
    ) -> Result<Vec<PairListing>, PipelineError> {
        info!(url = %self.index_url, "loading trending index");
        session
            .navigate(&self.index_url, WaitPolicy::NetworkIdle)
            .await?;

        let rendered =
            bounded_wait(session, &self.row_selector, &self.wait, &self.snapshot_path).await?;
        if !rendered {
            // parse anyway: rows may have rendered between the last poll and
            // now, and the zero-rows case produces the right error below
            debug!(selector = %self.row_selector, "row wait lapsed before parsing");
        }

        let content = session.content().await?;
        let document = Html::parse_document(&content);
        let context = ParseContext::new(&self.base_url, "trending index");

        let pairs = self
            .parser
            .parse(&document, &context)
            .map_err(PipelineError::Discovery)?;

        info!(pairs = pairs.len(), "trending pairs discovered");
        Ok(pairs)
    }
}
