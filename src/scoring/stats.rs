use crate::error::ScoreError;

/// Arithmetic mean. An empty sequence has no mean and is an error.
pub fn mean(values: &[f64]) -> Result<f64, ScoreError> {
    if values.is_empty() {
        return Err(ScoreError::EmptyInput("mean"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N, not N-1).
///
/// `mean_override` skips recomputing the mean when the caller already has it.
pub fn stddev(values: &[f64], mean_override: Option<f64>) -> Result<f64, ScoreError> {
    if values.is_empty() {
        return Err(ScoreError::EmptyInput("standard deviation"));
    }
    let avg = match mean_override {
        Some(m) => m,
        None => mean(values)?,
    };
    let variance = values.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Z-score of `value`, or exactly 0 when the distribution has no spread.
pub fn z_score(value: f64, mean: f64, stddev: f64) -> f64 {
    if stddev == 0.0 {
        0.0
    } else {
        (value - mean) / stddev
    }
}
