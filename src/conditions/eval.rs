//! condition evaluator
//!
//! compares one observed field value against one configured trigger value

use super::types::{Operator, TriggerValue};

/// evaluate `field_value <operator> trigger_value`
///
/// string operators compare against the stringified trigger value. ordering
/// operators parse both sides as floats; a side that is not numeric parses
/// to NaN and every comparison with NaN is false.
pub fn evaluate(field_value: &str, trigger_value: &TriggerValue, operator: &Operator) -> bool {
    match operator {
        Operator::Equal | Operator::Other(_) => field_value == trigger_value.to_string(),
        Operator::NotEqual => field_value != trigger_value.to_string(),
        Operator::GreaterThan => compare_number(field_value, trigger_value, |a, b| a > b),
        Operator::LessThan => compare_number(field_value, trigger_value, |a, b| a < b),
        Operator::GreaterThanOrEqual => compare_number(field_value, trigger_value, |a, b| a >= b),
        Operator::LessThanOrEqual => compare_number(field_value, trigger_value, |a, b| a <= b),
        Operator::Contains => field_value.contains(&trigger_value.to_string()),
        Operator::StartsWith => field_value.starts_with(&trigger_value.to_string()),
        Operator::EndsWith => field_value.ends_with(&trigger_value.to_string()),
    }
}

/// true if any of `field_values` matches any of `trigger_values`
pub fn evaluate_any(
    field_values: &[String],
    trigger_values: &[TriggerValue],
    operator: &Operator,
) -> bool {
    field_values.iter().any(|field_value| {
        trigger_values
            .iter()
            .any(|trigger_value| evaluate(field_value, trigger_value, operator))
    })
}

// ============================================================================
// Comparison Helpers
// ============================================================================

fn compare_number(
    field_value: &str,
    trigger_value: &TriggerValue,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    let actual = super::types::parse_float(field_value);
    let expected = trigger_value.as_f64();
    // f64 comparisons with NaN are already false
    cmp(actual, expected)
}
