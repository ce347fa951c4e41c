pub mod config;
pub mod error;
pub mod output;
pub mod records;
pub mod scoring;

pub use error::ScoreError;
pub use scoring::{compute_scores, rank_records, RankedEntry, ScoreParams};
