use serde::{Deserialize, Serialize};

/// One pair as discovered on the trending index page
///
/// Created by the list extractor, consumed once by the pipeline. `name`
/// carries the [`crate::domain::constants::UNKNOWN_PAIR_NAME`] sentinel when
/// the row's name cell is unreadable; `detail_url` is empty when the row's
/// link could not be resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairListing {
    pub name: String,
    pub detail_url: String,
}

impl PairListing {
    pub fn new(name: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_url: detail_url.into(),
        }
    }

    /// Whether the pipeline has a URL to navigate to for this pair
    pub fn has_detail_url(&self) -> bool {
        !self.detail_url.is_empty()
    }
}

/// One flattened output row: a wallet observed trading a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderRecord {
    pub pair: String,
    pub wallet: String,
}

/// Why a pair was dropped without contributing records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Descriptor carried no resolvable detail URL
    MissingUrl,
    /// Navigation or a bounded wait lapsed on the detail page
    NavigationTimeout(String),
    /// The activation control was not present on the detail page
    ControlNotFound(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "no detail URL"),
            Self::NavigationTimeout(detail) => write!(f, "navigation timeout: {detail}"),
            Self::ControlNotFound(label) => write!(f, "control '{label}' not found"),
        }
    }
}

/// Per-outcome accounting for one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Pairs returned by list discovery
    pub pairs_discovered: usize,
    /// Pairs whose detail page was extracted
    pub pairs_extracted: usize,
    /// Pairs skipped, with the reason logged at skip time
    pub pairs_skipped: usize,
    /// Flat records handed to the sink
    pub records_written: usize,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}
