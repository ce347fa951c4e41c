use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while ingesting records or computing a ranking.
///
/// Every variant except `Read`/`Csv` is a data problem: one bad record
/// invalidates the whole run because group statistics mix all members.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("line {line}: missing field '{field}'")]
    MissingField { line: u64, field: String },

    #[error("line {line}: field '{field}' has non-numeric value '{value}'")]
    Coercion {
        line: u64,
        field: String,
        value: String,
    },

    #[error("cannot compute the {0} of an empty sequence")]
    EmptyInput(&'static str),

    #[error("input contains no records")]
    NoRecords,

    #[error("failed to open {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),
}

impl ScoreError {
    /// True for errors caused by the content of the records rather than by
    /// reading the file.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, ScoreError::Read { .. } | ScoreError::Csv(_))
    }
}
