//! Infrastructure module - collaborators and extraction machinery
//!
//! The browser session and output sink the pipeline drives, the selector
//! catalog and parsers, configuration and logging.

pub mod browser;
pub mod config;
pub mod extraction;
pub mod logging;
pub mod sink;

pub use browser::{BrowserSession, ChromeSession, ControlLocator, SessionError, WaitPolicy};
pub use config::{AppConfig, BrowserConfig, FailurePolicy, OutputConfig, PipelineConfig, WaitPoint};
pub use extraction::{
    ExtractError, PageParser, ParseContext, SelectorCatalog, TraderTableParser, TrendingListParser,
};
pub use logging::init_logging;
pub use sink::{CsvSink, OutputSink, SinkError};
