use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combine::{weighted_sum, Weights};
use super::grouping::group_by;
use super::normalize::normalize;
use super::stats::mean;
use crate::error::ScoreError;
use crate::records::{coerce_numeric, read_records, RecordSet};

/// Everything the pipeline needs to know about the columns of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreParams {
    /// Criterion column -> weight. Also decides which columns are criteria.
    pub weights: Weights,
    /// Column identifying the judge of a record
    pub judge_key: String,
    /// Column identifying the scored entry
    pub entry_key: String,
    /// Name of the field the combined score is written to
    pub sum_field: String,
    /// Z-score each criterion per judge before weighting
    pub normalize_fields: bool,
}

impl ScoreParams {
    fn criteria(&self) -> Vec<&str> {
        self.weights.keys().map(String::as_str).collect()
    }
}

/// One judge's normalized combined score for an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeContribution {
    pub judge: String,
    pub score: f64,
}

/// Final standing of one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Mean of the judge-normalized combined scores
    pub score: f64,
    pub entry: String,
    /// Per-judge scores in input order
    pub contributions: Vec<JudgeContribution>,
}

impl RankedEntry {
    pub fn judges(&self) -> usize {
        self.contributions.len()
    }
}

/// Read `path` and rank its entries.
///
/// Highest score first. Equal scores are ordered by entry key, descending.
pub fn compute_scores(
    path: &Path,
    delimiter: u8,
    params: &ScoreParams,
) -> Result<Vec<RankedEntry>, ScoreError> {
    let records = read_records(path, delimiter)?;
    rank_records(records, params)
}

/// Rank entries from records that were already ingested.
pub fn rank_records(
    mut records: RecordSet,
    params: &ScoreParams,
) -> Result<Vec<RankedEntry>, ScoreError> {
    if records.is_empty() {
        return Err(ScoreError::NoRecords);
    }
    records.require_column(&params.judge_key)?;
    records.require_column(&params.entry_key)?;

    let criteria = params.criteria();
    coerce_numeric(&criteria, &mut records)?;

    let by_judge = group_by(&params.judge_key, &records)?;
    debug!(
        "Grouped {} records into {} judges",
        records.len(),
        by_judge.len()
    );

    if params.normalize_fields {
        normalize(&criteria, &by_judge, &mut records)?;
    }
    weighted_sum(&params.weights, &by_judge, &mut records, &params.sum_field)?;
    normalize(&[params.sum_field.as_str()], &by_judge, &mut records)?;

    // Same arena, second view: every rewrite above is visible here
    let by_entry = group_by(&params.entry_key, &records)?;
    debug!("Aggregating {} entries", by_entry.len());

    let mut ranking = Vec::with_capacity(by_entry.len());
    for (entry, members) in by_entry.iter() {
        let mut contributions = Vec::with_capacity(members.len());
        for &id in members {
            let record = records.get(id);
            contributions.push(JudgeContribution {
                judge: record.group_key(&params.judge_key)?,
                score: record.number(&params.sum_field)?,
            });
        }
        let values: Vec<f64> = contributions.iter().map(|c| c.score).collect();
        ranking.push(RankedEntry {
            score: mean(&values)?,
            entry: entry.to_string(),
            contributions,
        });
    }

    sort_ranking(&mut ranking);
    Ok(ranking)
}

/// Sort ascending by (score, entry) and reverse the whole sequence, so ties
/// land in descending entry-key order.
fn sort_ranking(ranking: &mut [RankedEntry]) {
    ranking.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entry.cmp(&b.entry))
    });
    ranking.reverse();
}
