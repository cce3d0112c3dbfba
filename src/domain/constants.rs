//! Site characteristics and domain constants

/// Dexscreener site constants
pub mod site {
    /// Index page listing pairs ranked by 24h trending score
    pub const TRENDING_INDEX_URL: &str =
        "https://dexscreener.com/solana?rankBy=trendingScoreH24&order=desc";

    /// Base URL for resolving relative pair links
    pub const BASE_URL: &str = "https://dexscreener.com";

    /// Visible label of the tab that reveals the trader table
    pub const TOP_TRADERS_LABEL: &str = "Top Traders";
}

/// Extraction caps
///
/// These bound the pipeline regardless of how many rows the site renders:
/// the ranking is only meaningful for the top of the list, and the trader
/// table is paginated past 100 entries anyway.
pub mod caps {
    /// Maximum pair descriptors taken from the index page
    pub const MAX_TRENDING_PAIRS: usize = 20;

    /// Maximum trader rows read per detail-page visit
    pub const MAX_TRADER_ROWS: usize = 100;
}

/// Sentinel used when a pair name cannot be read from its row
pub const UNKNOWN_PAIR_NAME: &str = "Unknown Coin";
