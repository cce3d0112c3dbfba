//! Trending list parser
//!
//! Turns a rendered index page into at most
//! [`caps::MAX_TRENDING_PAIRS`] pair descriptors in document order. Document
//! order encodes the site's ranking and must be preserved. Zero matching
//! rows is a hard error, never an empty result: an index page that rendered
//! without rows means the markup moved or the page never loaded, and the
//! run's output would be silently empty.

use super::{compile_selectors, ExtractError, ExtractResult, PageParser, ParseContext};
use super::selectors::TrendingListSelectors;
use crate::domain::constants::{caps, UNKNOWN_PAIR_NAME};
use crate::domain::model::PairListing;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

pub struct TrendingListParser {
    row_selectors: Vec<Selector>,
    name_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    /// Raw row selector strings, kept for the zero-rows diagnostic
    row_selector_strings: Vec<String>,
}

impl TrendingListParser {
    pub fn new() -> ExtractResult<Self> {
        Self::with_catalog(&TrendingListSelectors::default())
    }

    pub fn with_catalog(selectors: &TrendingListSelectors) -> ExtractResult<Self> {
        Ok(Self {
            row_selectors: compile_selectors(&selectors.row)?,
            name_selectors: compile_selectors(&selectors.pair_name)?,
            link_selectors: compile_selectors(&selectors.pair_link)?,
            row_selector_strings: selectors.row.clone(),
        })
    }

    fn extract_pair(&self, row: &ElementRef<'_>, context: &ParseContext) -> PairListing {
        let name = self
            .extract_text(row, &self.name_selectors)
            .unwrap_or_else(|| UNKNOWN_PAIR_NAME.to_string());

        // the site renders each row as an anchor, so the row's own href is
        // the primary source; nested anchors are the fallback
        let href = row
            .value()
            .attr("href")
            .map(str::to_string)
            .or_else(|| self.extract_href(row));

        let detail_url = match href {
            Some(href) => self.resolve_url(&href, &context.base_url),
            None => {
                warn!(pair = %name, "trending row carries no link");
                String::new()
            }
        };

        PairListing { name, detail_url }
    }

    fn extract_text(&self, element: &ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
        for selector in selectors {
            let text = element
                .select(selector)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty());
            if text.is_some() {
                return text;
            }
        }
        None
    }

    fn extract_href(&self, element: &ElementRef<'_>) -> Option<String> {
        for selector in &self.link_selectors {
            if let Some(href) = element
                .select(selector)
                .next()
                .and_then(|e| e.value().attr("href"))
            {
                return Some(href.to_string());
            }
        }
        None
    }

    /// Resolve a row href against the site base; empty string when the href
    /// cannot be made into a valid absolute URL
    fn resolve_url(&self, href: &str, base_url: &str) -> String {
        if href.starts_with("http") {
            return match Url::parse(href) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    warn!(href, error = %e, "unparsable absolute link on trending row");
                    String::new()
                }
            };
        }

        match Url::parse(base_url).and_then(|base| base.join(href)) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(href, base_url, error = %e, "failed to resolve trending row link");
                String::new()
            }
        }
    }
}

impl PageParser for TrendingListParser {
    type Output = Vec<PairListing>;

    fn parse(&self, html: &Html, context: &ParseContext) -> ExtractResult<Self::Output> {
        let mut rows: Vec<ElementRef<'_>> = Vec::new();
        for selector in &self.row_selectors {
            rows = html.select(selector).collect();
            if !rows.is_empty() {
                break;
            }
        }

        if rows.is_empty() {
            return Err(ExtractError::NoTrendingRows {
                tried_selectors: self.row_selector_strings.clone(),
            });
        }

        let pairs: Vec<PairListing> = rows
            .iter()
            .take(caps::MAX_TRENDING_PAIRS)
            .map(|row| self.extract_pair(row, context))
            .collect();

        debug!(
            page = %context.page_label,
            total_rows = rows.len(),
            taken = pairs.len(),
            "extracted trending pairs"
        );

        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://dexscreener.com";

    fn parse(html: &str) -> ExtractResult<Vec<PairListing>> {
        let parser = TrendingListParser::new().unwrap();
        let document = Html::parse_document(html);
        parser.parse(&document, &ParseContext::new(BASE, "index"))
    }

    fn row(name: &str, href: &str) -> String {
        format!(
            r#"<a class="ds-dex-table-row ds-dex-table-row-top" href="{href}">
                 <div class="ds-table-data-cell ds-dex-table-row-col-token">
                   <span class="ds-dex-table-row-base-token-name-text">{name}</span>
                 </div>
               </a>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!("<html><body><div>{}</div></body></html>", rows.join("\n"))
    }

    #[test]
    fn returns_rows_in_document_order() {
        let html = page(&[
            row("PEPE", "/solana/pepe"),
            row("WIF", "/solana/wif"),
            row("BONK", "/solana/bonk"),
        ]);
        let pairs = parse(&html).unwrap();
        let names: Vec<_> = pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["PEPE", "WIF", "BONK"]);
        assert_eq!(pairs[0].detail_url, "https://dexscreener.com/solana/pepe");
    }

    #[test]
    fn caps_at_twenty_rows() {
        let rows: Vec<String> = (0..35)
            .map(|i| row(&format!("TOKEN{i}"), &format!("/solana/t{i}")))
            .collect();
        let pairs = parse(&page(&rows)).unwrap();
        assert_eq!(pairs.len(), caps::MAX_TRENDING_PAIRS);
        assert_eq!(pairs[19].name, "TOKEN19");
    }

    #[test]
    fn zero_rows_is_an_error() {
        let err = parse("<html><body><p>loading…</p></body></html>").unwrap_err();
        match err {
            ExtractError::NoTrendingRows { ref tried_selectors } => {
                assert!(!tried_selectors.is_empty());
            }
            other => panic!("expected NoTrendingRows, got {other:?}"),
        }
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_name_falls_back_to_sentinel() {
        let html = page(&[
            r#"<a class="ds-dex-table-row ds-dex-table-row-top" href="/solana/x"></a>"#.to_string(),
        ]);
        let pairs = parse(&html).unwrap();
        assert_eq!(pairs[0].name, UNKNOWN_PAIR_NAME);
        assert!(pairs[0].has_detail_url());
    }

    #[test]
    fn missing_link_yields_empty_url() {
        let html = page(&[r#"<div class="ds-dex-table-row ds-dex-table-row-top">
            <span class="ds-dex-table-row-base-token-name-text">PEPE</span>
        </div>"#
            .to_string()]);
        let pairs = parse(&html).unwrap();
        assert_eq!(pairs[0].name, "PEPE");
        assert!(!pairs[0].has_detail_url());
    }

    #[test]
    fn absolute_links_pass_through() {
        let html = page(&[row("PEPE", "https://dexscreener.com/solana/pepe")]);
        let pairs = parse(&html).unwrap();
        assert_eq!(pairs[0].detail_url, "https://dexscreener.com/solana/pepe");
    }
}
