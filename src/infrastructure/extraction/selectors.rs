//! Selector catalog
//!
//! The single place extraction rules are defined: every structural selector,
//! attribute name and derived-substring delimiter the parsers use comes from
//! here, so a site markup change is one edit (or one config override).
//! Entries are fallback chains tried in order.

use serde::{Deserialize, Serialize};

/// Complete selector catalog for the site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorCatalog {
    pub trending_list: TrendingListSelectors,
    pub trader_table: TraderTableSelectors,
}

/// Selectors for the trending index page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingListSelectors {
    /// Row containers, one per ranked pair; document order is the ranking
    pub row: Vec<String>,

    /// Pair display name inside a row (trimmed text content)
    pub pair_name: Vec<String>,

    /// Detail-page link inside a row; the row element's own `href` is tried
    /// first since the site renders each row as an anchor
    pub pair_link: Vec<String>,
}

impl Default for TrendingListSelectors {
    fn default() -> Self {
        Self {
            row: vec![
                ".ds-dex-table-row.ds-dex-table-row-top".to_string(),
                "a.ds-dex-table-row".to_string(),
                ".ds-dex-table-row".to_string(),
            ],
            pair_name: vec![
                ".ds-dex-table-row-base-token-name-text".to_string(),
                ".ds-table-data-cell.ds-dex-table-row-col-token .ds-dex-table-row-base-token-name-text"
                    .to_string(),
                ".ds-dex-table-row-base-token-symbol-text".to_string(),
            ],
            pair_link: vec!["a[href*='/solana/']".to_string(), "a[href]".to_string()],
        }
    }
}

impl TrendingListSelectors {
    /// Selector the pipeline waits on before declaring the list rendered
    pub fn primary_row_selector(&self) -> &str {
        self.row.first().map(String::as_str).unwrap_or("")
    }
}

/// Selectors for the trader table on a detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderTableSelectors {
    /// The secondary container that materializes after tab activation
    pub table_container: Vec<String>,

    /// Trader rows under the container
    pub row: Vec<String>,

    /// Explorer link inside a row whose `href` carries the wallet address
    pub explorer_link: Vec<String>,

    /// Delimiter after which the wallet address starts in the explorer href
    pub wallet_delimiter: String,
}

impl Default for TraderTableSelectors {
    fn default() -> Self {
        Self {
            table_container: vec![
                "#topTradersTable tbody".to_string(),
                "#topTradersTable".to_string(),
            ],
            row: vec!["tr".to_string()],
            explorer_link: vec![
                "a[href*='solscan.io/account']".to_string(),
                "a[href*='/account/']".to_string(),
            ],
            wallet_delimiter: "/account/".to_string(),
        }
    }
}

impl TraderTableSelectors {
    /// Selector the detail stage waits on after activating the tab
    pub fn primary_container_selector(&self) -> &str {
        self.table_container.first().map(String::as_str).unwrap_or("")
    }
}
