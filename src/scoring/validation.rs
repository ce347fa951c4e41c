use super::pipeline::ScoreParams;

/// Validate scoring parameters before reading any input.
/// Returns all validation errors at once (not just the first).
pub fn validate_params(params: &ScoreParams) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if params.weights.is_empty() {
        errors.push("weights: at least one criterion column must be weighted".to_string());
    }

    for (field, weight) in &params.weights {
        if field.trim().is_empty() {
            errors.push("weights: criterion column name must not be empty".to_string());
        }
        if !weight.is_finite() {
            errors.push(format!(
                "weights.{}: must be a finite number, got {}",
                field, weight
            ));
        }
        // Criteria are coerced and normalized in place; key columns must keep their text
        if *field == params.judge_key {
            errors.push(format!("weights.{}: '{}' is also the judge column", field, field));
        }
        if *field == params.entry_key {
            errors.push(format!("weights.{}: '{}' is also the entry column", field, field));
        }
    }

    let names = [
        ("judge_key", &params.judge_key),
        ("entry_key", &params.entry_key),
        ("sum_field", &params.sum_field),
    ];
    for (label, value) in names {
        if value.trim().is_empty() {
            errors.push(format!("{}: must not be empty", label));
        }
    }

    // The sum field is written onto every record; it must not clobber an input column
    if !params.sum_field.is_empty() {
        if params.sum_field == params.judge_key {
            errors.push(format!(
                "sum_field: '{}' is also the judge column",
                params.sum_field
            ));
        }
        if params.sum_field == params.entry_key {
            errors.push(format!(
                "sum_field: '{}' is also the entry column",
                params.sum_field
            ));
        }
        if params.weights.contains_key(&params.sum_field) {
            errors.push(format!(
                "sum_field: '{}' is also a weighted criterion",
                params.sum_field
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
