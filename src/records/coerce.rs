use tracing::debug;

use super::{FieldValue, RecordSet};
use crate::error::ScoreError;

/// Convert the named fields of every record to numbers.
///
/// Runs over the whole set before any grouping so a single bad cell aborts
/// the run early. Surrounding whitespace is ignored; empty cells, words and
/// non-finite values (`NaN`, `inf`) are rejected.
pub fn coerce_numeric<S: AsRef<str>>(
    fields: &[S],
    records: &mut RecordSet,
) -> Result<(), ScoreError> {
    for field in fields {
        records.require_column(field.as_ref())?;
    }

    for record in records.records_mut() {
        for field in fields {
            let field = field.as_ref();
            let number = match record.get(field) {
                Some(FieldValue::Number(n)) => *n,
                Some(FieldValue::Text(raw)) => parse_number(raw).ok_or_else(|| {
                    ScoreError::Coercion {
                        line: record.line,
                        field: field.to_string(),
                        value: raw.clone(),
                    }
                })?,
                None => {
                    return Err(ScoreError::MissingField {
                        line: record.line,
                        field: field.to_string(),
                    })
                }
            };
            record.set_number(field, number);
        }
    }

    debug!(
        "Coerced {} fields across {} records",
        fields.len(),
        records.len()
    );
    Ok(())
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
