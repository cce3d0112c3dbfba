//! Domain module - core data model of the extraction pipeline
//!
//! Pair descriptors discovered on the index page, the ordered wallet
//! accumulation owned by the pipeline, and the flat output records.

pub mod accumulation;
pub mod constants;
pub mod model;

pub use accumulation::WalletLedger;
pub use model::{PairListing, RunSummary, SkipReason, TraderRecord};
