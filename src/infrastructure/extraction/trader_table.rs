//! Trader table parser
//!
//! Extracts wallet addresses from the secondary table a detail page reveals
//! after tab activation. At most [`caps::MAX_TRADER_ROWS`] rows are read per
//! visit; rows whose derived wallet is empty are dropped, not errors.

use super::{compile_selectors, ExtractError, ExtractResult, PageParser, ParseContext};
use super::selectors::TraderTableSelectors;
use crate::domain::constants::caps;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub struct TraderTableParser {
    container_selectors: Vec<Selector>,
    row_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    wallet_delimiter: String,
    /// Fallback when no explorer anchor matches: the delimiter pattern
    /// searched in the row's raw markup
    wallet_pattern: Regex,
}

impl TraderTableParser {
    pub fn new() -> ExtractResult<Self> {
        Self::with_catalog(&TraderTableSelectors::default())
    }

    pub fn with_catalog(selectors: &TraderTableSelectors) -> ExtractResult<Self> {
        let pattern = format!(
            "{}([1-9A-HJ-NP-Za-km-z]+)",
            regex::escape(&selectors.wallet_delimiter)
        );
        let wallet_pattern =
            Regex::new(&pattern).map_err(|e| ExtractError::InvalidWalletPattern {
                pattern,
                reason: e.to_string(),
            })?;

        Ok(Self {
            container_selectors: compile_selectors(&selectors.table_container)?,
            row_selectors: compile_selectors(&selectors.row)?,
            link_selectors: compile_selectors(&selectors.explorer_link)?,
            wallet_delimiter: selectors.wallet_delimiter.clone(),
            wallet_pattern,
        })
    }

    /// Wallet address for one row: the substring of the explorer href after
    /// the delimiter, stripped of any query or fragment
    fn extract_wallet(&self, row: &ElementRef<'_>) -> Option<String> {
        for selector in &self.link_selectors {
            if let Some(href) = row
                .select(selector)
                .next()
                .and_then(|e| e.value().attr("href"))
            {
                return self.derive_wallet(href);
            }
        }

        // markup drift fallback: the delimiter pattern anywhere in the row
        self.wallet_pattern
            .captures(&row.html())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn derive_wallet(&self, href: &str) -> Option<String> {
        let (_, after) = href.split_once(&self.wallet_delimiter)?;
        let wallet = after
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_matches('/')
            .to_string();
        Some(wallet)
    }
}

impl PageParser for TraderTableParser {
    type Output = Vec<String>;

    fn parse(&self, html: &Html, context: &ParseContext) -> ExtractResult<Self::Output> {
        let mut container: Option<ElementRef<'_>> = None;
        for selector in &self.container_selectors {
            container = html.select(selector).next();
            if container.is_some() {
                break;
            }
        }

        // the caller already waited for the container; its absence here just
        // means zero rows for this visit
        let Some(container) = container else {
            debug!(page = %context.page_label, "trader table container absent");
            return Ok(Vec::new());
        };

        let mut rows: Vec<ElementRef<'_>> = Vec::new();
        for selector in &self.row_selectors {
            rows = container.select(selector).collect();
            if !rows.is_empty() {
                break;
            }
        }

        let wallets: Vec<String> = rows
            .iter()
            .take(caps::MAX_TRADER_ROWS)
            .filter_map(|row| self.extract_wallet(row))
            .filter(|wallet| !wallet.is_empty())
            .collect();

        debug!(
            page = %context.page_label,
            rows = rows.len(),
            wallets = wallets.len(),
            "extracted trader wallets"
        );

        Ok(wallets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(html: &str) -> Vec<String> {
        let parser = TraderTableParser::new().unwrap();
        let document = Html::parse_document(html);
        parser
            .parse(&document, &ParseContext::new("https://dexscreener.com", "detail"))
            .unwrap()
    }

    fn table(rows: &str) -> String {
        format!(r#"<html><body><table id="topTradersTable"><tbody>{rows}</tbody></table></body></html>"#)
    }

    fn trader_row(wallet: &str) -> String {
        format!(r#"<tr><td><a href="https://solscan.io/account/{wallet}">view</a></td></tr>"#)
    }

    #[test]
    fn derives_wallets_from_explorer_links_in_order() {
        let html = table(&[trader_row("9xQeWvG81"), trader_row("3nGhTxP42")].join(""));
        assert_eq!(parse(&html), ["9xQeWvG81", "3nGhTxP42"]);
    }

    #[test]
    fn rows_without_wallet_are_dropped() {
        let rows = format!(
            "{}{}{}",
            trader_row("9xQeWvG81"),
            r#"<tr><td>no link here</td></tr>"#,
            r#"<tr><td><a href="https://solscan.io/account/">empty</a></td></tr>"#,
        );
        assert_eq!(parse(&table(&rows)), ["9xQeWvG81"]);
    }

    #[test]
    fn caps_at_one_hundred_rows() {
        let rows: String = (0..120).map(|i| trader_row(&format!("w{i}xyz"))).collect();
        let wallets = parse(&table(&rows));
        assert_eq!(wallets.len(), caps::MAX_TRADER_ROWS);
        assert_eq!(wallets[0], "w0xyz");
    }

    #[test]
    fn missing_container_yields_no_wallets() {
        assert!(parse("<html><body><p>nothing</p></body></html>").is_empty());
    }

    #[test]
    fn query_and_fragment_are_stripped() {
        let html = table(r#"<tr><td><a href="/account/9xQeWvG81?cluster=mainnet#txs">x</a></td></tr>"#);
        assert_eq!(parse(&html), ["9xQeWvG81"]);
    }

    #[rstest]
    #[case("https://solscan.io/account/9xQeWvG81", Some("9xQeWvG81"))]
    #[case("/account/9xQeWvG81?cluster=mainnet", Some("9xQeWvG81"))]
    #[case("https://solscan.io/account/", Some(""))]
    #[case("https://solscan.io/token/9xQeWvG81", None)]
    fn wallet_derivation_cases(#[case] href: &str, #[case] expected: Option<&str>) {
        let parser = TraderTableParser::new().unwrap();
        assert_eq!(parser.derive_wallet(href).as_deref(), expected);
    }

    #[test]
    fn regex_fallback_catches_unanchored_markup() {
        // explorer link structured unusually: no matching anchor selector
        let html = table(
            r#"<tr><td data-explorer="https://explorer.example/account/7kPmNvQ55">trader</a></td></tr>"#,
        );
        assert_eq!(parse(&html), ["7kPmNvQ55"]);
    }
}
