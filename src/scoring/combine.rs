use std::collections::BTreeMap;

use tracing::debug;

use super::grouping::Grouping;
use crate::error::ScoreError;
use crate::records::RecordSet;

/// Criterion column name to weight. Membership in the map is what makes a
/// column count toward the sum; there is no implicit default weight.
pub type Weights = BTreeMap<String, f64>;

/// Store `sum(record[field] * weight)` into `save_to` on every grouped record.
pub fn weighted_sum(
    weights: &Weights,
    grouping: &Grouping,
    records: &mut RecordSet,
    save_to: &str,
) -> Result<(), ScoreError> {
    for (_, members) in grouping.iter() {
        for &id in members {
            let record = records.get(id);
            let mut total = 0.0;
            for (field, weight) in weights {
                total += record.number(field)? * weight;
            }
            records.get_mut(id).set_number(save_to, total);
        }
    }

    debug!(
        "Combined {} weighted fields into '{}'",
        weights.len(),
        save_to
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;
    use crate::scoring::grouping::group_by;

    fn weights(pairs: &[(&str, f64)]) -> Weights {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn one_record(fields: &[(&str, f64)]) -> RecordSet {
        let record = fields
            .iter()
            .fold(Record::new(2).with_text("judge", "A"), |r, (k, v)| {
                r.with_number(k, *v)
            });
        std::iter::once(record).collect()
    }

    #[test]
    fn test_weighted_sum_is_dot_product() {
        let mut records = one_record(&[("Design", 2.0), ("Progress", 3.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        let w = weights(&[("Design", 0.5), ("Progress", 2.0)]);
        weighted_sum(&w, &by_judge, &mut records, "sum").unwrap();

        let (_, record) = records.iter().next().unwrap();
        assert_eq!(record.number("sum").unwrap(), 7.0);
    }

    #[test]
    fn test_unmapped_fields_do_not_contribute() {
        let mut records = one_record(&[("Design", 2.0), ("Video", 100.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        weighted_sum(&weights(&[("Design", 1.0)]), &by_judge, &mut records, "sum").unwrap();

        let (_, record) = records.iter().next().unwrap();
        assert_eq!(record.number("sum").unwrap(), 2.0);
        assert_eq!(record.number("Video").unwrap(), 100.0);
    }

    #[test]
    fn test_negative_and_zero_weights() {
        let mut records = one_record(&[("Design", 4.0), ("Bugs", 3.0), ("Misc", 9.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        let w = weights(&[("Design", 1.0), ("Bugs", -2.0), ("Misc", 0.0)]);
        weighted_sum(&w, &by_judge, &mut records, "sum").unwrap();

        let (_, record) = records.iter().next().unwrap();
        assert_eq!(record.number("sum").unwrap(), -2.0);
    }

    #[test]
    fn test_empty_weights_sum_to_zero() {
        let mut records = one_record(&[("Design", 4.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        weighted_sum(&Weights::new(), &by_judge, &mut records, "sum").unwrap();

        let (_, record) = records.iter().next().unwrap();
        assert_eq!(record.number("sum").unwrap(), 0.0);
    }

    #[test]
    fn test_missing_weighted_field_fails() {
        let mut records = one_record(&[("Design", 4.0)]);
        let by_judge = group_by("judge", &records).unwrap();
        let err = weighted_sum(
            &weights(&[("Progress", 1.0)]),
            &by_judge,
            &mut records,
            "sum",
        )
        .unwrap_err();
        assert!(matches!(err, ScoreError::MissingField { .. }));
    }
}
