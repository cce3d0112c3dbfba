//! Typed extraction errors
//!
//! Only [`ExtractError::NoTrendingRows`] invalidates a whole run; everything
//! else is either a construction-time defect or absorbed at item granularity
//! by the pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExtractError {
    #[error("no trending rows found on the index page (tried selectors: {})", tried_selectors.join(", "))]
    NoTrendingRows { tried_selectors: Vec<String> },

    #[error("no usable selector in chain: {reason}")]
    InvalidSelectorChain { reason: String },

    #[error("invalid wallet pattern '{pattern}': {reason}")]
    InvalidWalletPattern { pattern: String, reason: String },
}

impl ExtractError {
    /// Whether this error aborts the run rather than skipping an item
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::NoTrendingRows { .. } => true,
            // construction-time defects surface before the pipeline starts
            Self::InvalidSelectorChain { .. } | Self::InvalidWalletPattern { .. } => true,
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
