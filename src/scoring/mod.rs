pub mod combine;
pub mod grouping;
pub mod normalize;
pub mod pipeline;
pub mod stats;
pub mod validation;

pub use combine::{weighted_sum, Weights};
pub use grouping::{group_by, Grouping};
pub use normalize::normalize;
pub use pipeline::{compute_scores, rank_records, JudgeContribution, RankedEntry, ScoreParams};
pub use validation::validate_params;
