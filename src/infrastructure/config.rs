//! Application configuration
//!
//! Nested serde structs with field-by-field defaults, loaded from an
//! optional TOML file layered under `DEX_TOP_TRADERS_*` environment
//! overrides. Every wait point carries its failure policy explicitly, so
//! abort/skip/retry behavior is configuration rather than duplicated code
//! paths.

use crate::domain::constants::site;
use crate::infrastructure::extraction::SelectorCatalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named defaults, single place the numbers live
pub mod defaults {
    /// Bounded wait for the trending rows to render
    pub const LIST_WAIT_TIMEOUT_MS: u64 = 10_000;

    /// Bounded wait for the trader table after tab activation
    pub const TABLE_WAIT_TIMEOUT_MS: u64 = 5_000;

    /// Settle delay after activating the tab
    pub const SETTLE_DELAY_MS: u64 = 2_000;

    /// Politeness delay between pair iterations
    pub const ITEM_DELAY_MS: u64 = 2_000;

    /// Quiescence window after the load event for late-rendered content
    pub const NAV_QUIESCE_MS: u64 = 3_000;

    pub const IDLE_BROWSER_TIMEOUT_SECS: u64 = 90;

    pub const WINDOW_WIDTH: u32 = 1920;
    pub const WINDOW_HEIGHT: u32 = 1080;

    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    pub const CSV_PATH: &str = "top_traders.csv";
    pub const SNAPSHOT_DIR: &str = ".";
    pub const LOG_DIR: &str = "logs";
}

/// What happens when a bounded wait lapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Invalidate the whole run
    Abort,
    /// Drop the current item, keep going
    Skip,
    /// One more wait of the same length, then skip
    RetryOnce,
}

/// A bounded wait with its failure policy attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitPoint {
    pub timeout_ms: u64,
    pub policy: FailurePolicy,
}

impl WaitPoint {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub browser: BrowserConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    pub selectors: SelectorCatalog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub sandbox: bool,
    /// Anti-detection launch arguments
    pub stealth: bool,
    pub user_agent: String,
    pub proxy_server: Option<String>,
    pub idle_timeout_secs: u64,
    pub nav_quiesce_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: defaults::WINDOW_WIDTH,
            window_height: defaults::WINDOW_HEIGHT,
            sandbox: true,
            stealth: true,
            user_agent: defaults::USER_AGENT.to_string(),
            proxy_server: None,
            idle_timeout_secs: defaults::IDLE_BROWSER_TIMEOUT_SECS,
            nav_quiesce_ms: defaults::NAV_QUIESCE_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Index page listing the ranked pairs
    pub index_url: String,

    /// Visible label of the control that reveals the trader table
    pub traders_tab_label: String,

    /// Wait for the trending rows; lapse invalidates the run
    pub list_wait: WaitPoint,

    /// Wait for the trader table; lapse retries once, then skips the pair
    pub table_wait: WaitPoint,

    pub settle_delay_ms: u64,
    pub item_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            index_url: site::TRENDING_INDEX_URL.to_string(),
            traders_tab_label: site::TOP_TRADERS_LABEL.to_string(),
            list_wait: WaitPoint {
                timeout_ms: defaults::LIST_WAIT_TIMEOUT_MS,
                policy: FailurePolicy::Abort,
            },
            table_wait: WaitPoint {
                timeout_ms: defaults::TABLE_WAIT_TIMEOUT_MS,
                policy: FailurePolicy::RetryOnce,
            },
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
            item_delay_ms: defaults::ITEM_DELAY_MS,
        }
    }
}

impl PipelineConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: String,
    /// Diagnostic snapshots land here under fixed names
    pub snapshot_dir: String,
    pub log_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: defaults::CSV_PATH.to_string(),
            snapshot_dir: defaults::SNAPSHOT_DIR.to_string(),
            log_dir: defaults::LOG_DIR.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: optional `dex-top-traders.toml` in the working
    /// directory, then `DEX_TOP_TRADERS_*` environment overrides, over the
    /// serde defaults.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("dex-top-traders").required(false))
            .add_source(
                config::Environment::with_prefix("DEX_TOP_TRADERS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to assemble configuration sources")?;

        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_documented_policies() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.pipeline.list_wait.policy, FailurePolicy::Abort);
        assert_eq!(cfg.pipeline.table_wait.policy, FailurePolicy::RetryOnce);
        assert_eq!(cfg.pipeline.list_wait.timeout(), Duration::from_secs(10));
        assert!(cfg.browser.headless);
        assert_eq!(cfg.output.csv_path, "top_traders.csv");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let toml = r#"
            [pipeline]
            item_delay_ms = 500

            [browser]
            headless = false
        "#;
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!cfg.browser.headless);
        assert_eq!(cfg.pipeline.item_delay(), Duration::from_millis(500));
        // untouched sections keep their defaults
        assert_eq!(cfg.pipeline.list_wait.policy, FailurePolicy::Abort);
        assert_eq!(cfg.selectors.trader_table.wallet_delimiter, "/account/");
    }
}
