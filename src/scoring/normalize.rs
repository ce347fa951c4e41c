use tracing::{debug, warn};

use super::grouping::Grouping;
use super::stats::{mean, stddev, z_score};
use crate::error::ScoreError;
use crate::records::RecordSet;

/// Replace each named field with its z-score inside its own group.
///
/// Groups are normalized independently: a record's value only depends on the
/// other members of its group. Values are rewritten in place in the arena, so
/// any other grouping over the same `RecordSet` sees them. A group whose
/// values are all equal normalizes to exactly 0.
pub fn normalize<S: AsRef<str>>(
    fields: &[S],
    grouping: &Grouping,
    records: &mut RecordSet,
) -> Result<(), ScoreError> {
    for (name, members) in grouping.iter() {
        for field in fields {
            let field = field.as_ref();
            let values = members
                .iter()
                .map(|&id| records.get(id).number(field))
                .collect::<Result<Vec<f64>, _>>()?;

            let avg = mean(&values)?;
            let std = stddev(&values, Some(avg))?;
            if std == 0.0 && members.len() > 1 {
                warn!(
                    "{} '{}' gave every record the same '{}'; normalized to 0",
                    grouping.key(),
                    name,
                    field
                );
            }

            for (&id, &value) in members.iter().zip(&values) {
                records.get_mut(id).set_number(field, z_score(value, avg, std));
            }
        }
    }

    debug!(
        "Normalized {} fields within {} groups of '{}'",
        fields.len(),
        grouping.len(),
        grouping.key()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Record, RecordId};
    use crate::scoring::grouping::group_by;

    fn scores(rows: &[(&str, &str, f64, f64)]) -> RecordSet {
        rows.iter()
            .enumerate()
            .map(|(i, (entry, judge, q, r))| {
                Record::new(i as u64 + 2)
                    .with_text("entry", entry)
                    .with_text("judge", judge)
                    .with_number("Q", *q)
                    .with_number("R", *r)
            })
            .collect()
    }

    fn field_values(records: &RecordSet, ids: &[RecordId], field: &str) -> Vec<f64> {
        ids.iter()
            .map(|&id| records.get(id).number(field).unwrap())
            .collect()
    }

    #[test]
    fn test_normalizes_each_group_independently() {
        let mut records = scores(&[
            ("X", "A", 10.0, 0.0),
            ("Y", "A", 20.0, 0.0),
            ("X", "B", 30.0, 0.0),
            ("Y", "B", 10.0, 0.0),
        ]);
        let by_judge = group_by("judge", &records).unwrap();
        normalize(&["Q"], &by_judge, &mut records).unwrap();

        let a = by_judge.get("A").unwrap();
        let b = by_judge.get("B").unwrap();
        assert_eq!(field_values(&records, a, "Q"), vec![-1.0, 1.0]);
        assert_eq!(field_values(&records, b, "Q"), vec![1.0, -1.0]);
    }

    #[test]
    fn test_zero_mean_after_normalization() {
        let mut records = scores(&[
            ("X", "A", 3.0, 1.0),
            ("Y", "A", 8.0, 9.0),
            ("Z", "A", 4.5, 2.0),
            ("W", "A", 9.5, 7.0),
            ("X", "B", 1.0, 5.0),
            ("Y", "B", 2.0, 6.5),
            ("Z", "B", 6.0, 1.0),
        ]);
        let by_judge = group_by("judge", &records).unwrap();
        normalize(&["Q", "R"], &by_judge, &mut records).unwrap();

        for (_, members) in by_judge.iter() {
            for field in ["Q", "R"] {
                let values = field_values(&records, members, field);
                let avg = mean(&values).unwrap();
                let std = stddev(&values, None).unwrap();
                assert!(avg.abs() < 1e-12, "mean of {field} was {avg}");
                assert!((std - 1.0).abs() < 1e-12, "stddev of {field} was {std}");
            }
        }
    }

    #[test]
    fn test_degenerate_group_is_exactly_zero() {
        let mut records = scores(&[("X", "A", 7.0, 1.0), ("Y", "A", 7.0, 2.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        normalize(&["Q"], &by_judge, &mut records).unwrap();
        let a = by_judge.get("A").unwrap();
        assert_eq!(field_values(&records, a, "Q"), vec![0.0, 0.0]);
    }

    #[test]
    fn test_single_member_group_is_zero() {
        let mut records = scores(&[("X", "A", 7.0, 1.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        normalize(&["Q", "R"], &by_judge, &mut records).unwrap();
        let a = by_judge.get("A").unwrap();
        assert_eq!(field_values(&records, a, "Q"), vec![0.0]);
        assert_eq!(field_values(&records, a, "R"), vec![0.0]);
    }

    #[test]
    fn test_untouched_fields_keep_raw_values() {
        let mut records = scores(&[("X", "A", 10.0, 3.0), ("Y", "A", 20.0, 4.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        normalize(&["Q"], &by_judge, &mut records).unwrap();
        let a = by_judge.get("A").unwrap();
        assert_eq!(field_values(&records, a, "R"), vec![3.0, 4.0]);
    }

    #[test]
    fn test_rewrite_visible_through_other_view() {
        let mut records = scores(&[
            ("X", "A", 10.0, 0.0),
            ("Y", "A", 20.0, 0.0),
            ("X", "B", 30.0, 0.0),
            ("Y", "B", 10.0, 0.0),
        ]);
        let by_judge = group_by("judge", &records).unwrap();
        let by_entry = group_by("entry", &records).unwrap();
        normalize(&["Q"], &by_judge, &mut records).unwrap();

        let x = by_entry.get("X").unwrap();
        assert_eq!(field_values(&records, x, "Q"), vec![-1.0, 1.0]);
    }

    #[test]
    fn test_missing_field_fails() {
        let mut records = scores(&[("X", "A", 1.0, 2.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        assert!(matches!(
            normalize(&["S"], &by_judge, &mut records),
            Err(ScoreError::MissingField { .. })
        ));
    }
}
