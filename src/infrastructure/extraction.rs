//! HTML extraction infrastructure
//!
//! Trait-based extraction with a single selector catalog, compiled-once
//! selectors and typed errors. The two parsers are pure functions over an
//! already-rendered document; everything that touches the live page lives in
//! the browser session, not here.

pub mod context;
pub mod error;
pub mod selectors;
pub mod trader_table;
pub mod trending_list;

pub use context::ParseContext;
pub use error::{ExtractError, ExtractResult};
pub use selectors::{SelectorCatalog, TraderTableSelectors, TrendingListSelectors};
pub use trader_table::TraderTableParser;
pub use trending_list::TrendingListParser;

use scraper::{Html, Selector};
use tracing::warn;

/// Parser over a rendered document with contextual information
pub trait PageParser {
    type Output;

    fn parse(&self, html: &Html, context: &ParseContext) -> ExtractResult<Self::Output>;
}

/// Compile a selector fallback chain, keeping whatever parses
///
/// Individual failures are tolerated so one bad entry in a hand-edited
/// catalog does not take the whole chain down; an empty result is an error
/// because the parser would be blind.
pub(crate) fn compile_selectors(selector_strings: &[String]) -> ExtractResult<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("failed to compile selector '{}': {}", selector_str, e);
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        return Err(ExtractError::InvalidSelectorChain {
            reason: errors.join(", "),
        });
    }

    Ok(selectors)
}
