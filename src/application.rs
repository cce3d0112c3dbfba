//! Application module - the pipeline and its two extraction stages

pub mod detail;
pub mod listing;
pub mod pipeline;
pub(crate) mod waits;

pub use detail::{DetailExtractor, DetailOutcome};
pub use listing::ListDiscovery;
pub use pipeline::{PipelineError, PipelineStage, TrendingPipeline, OUTPUT_SCHEMA};
