//! Alert evaluation
//!
//! Applies an alert's threshold expression to the latest result of its
//! query. Malformed or missing result data never propagates an error:
//! the evaluation degrades to [`State::Unknown`] and is logged.

use tracing::warn;

use crate::queries::ResultSet;
use crate::{AlertDefinition, Op, State};

/// Compute the new semantic state of `alert` from its query's latest result.
pub fn evaluate(alert: &AlertDefinition, latest_result: Option<&ResultSet>) -> State {
    let Some(result) = latest_result else {
        warn!(alert_id = alert.id, "no result set available, state unknown");
        return State::Unknown;
    };

    let Some(value) = result.first_value(&alert.options.column) else {
        warn!(
            alert_id = alert.id,
            column = %alert.options.column,
            "column missing from result or result empty, state unknown"
        );
        return State::Unknown;
    };

    match compare(alert.options.op, value, &alert.options.value) {
        Some(true) => State::Triggered,
        Some(false) => State::Ok,
        None => {
            warn!(
                alert_id = alert.id,
                column = %alert.options.column,
                "value not comparable to threshold, state unknown"
            );
            State::Unknown
        }
    }
}

/// Applies `op` between a result value and the configured threshold.
///
/// Numeric comparison when both sides are numeric (JSON numbers or numeric
/// strings); string comparison is limited to (in)equality. Returns `None`
/// when the sides cannot be compared.
fn compare(op: Op, value: &serde_json::Value, threshold: &serde_json::Value) -> Option<bool> {
    if let (Some(value), Some(threshold)) = (as_number(value), as_number(threshold)) {
        return Some(match op {
            Op::GreaterThan => value > threshold,
            Op::GreaterThanOrEqual => value >= threshold,
            Op::LessThan => value < threshold,
            Op::LessThanOrEqual => value <= threshold,
            Op::Equals => value == threshold,
            Op::NotEquals => value != threshold,
        });
    }

    if let (Some(value), Some(threshold)) = (value.as_str(), threshold.as_str()) {
        return match op {
            Op::Equals => Some(value == threshold),
            Op::NotEquals => Some(value != threshold),
            _ => None,
        };
    }

    None
}

fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
