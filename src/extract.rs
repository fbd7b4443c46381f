//! Pulls a numeric amount for one period out of an arbitrarily-shaped
//! extraction record. The extraction service's output shape is not
//! contractually stable; all of the shape-guessing lives here so downstream
//! code sees plain numbers, with "missing" kept distinct from "zero".

use crate::schema::Period;
use serde_json::Value;

/// Candidate field names for the current reporting period, in priority order.
const CURRENT_FIELDS: &[&str] = &[
    "amount",
    "currentYearAmount",
    "current_year_amount",
    "value",
    "currentYear",
    "current_year",
    "currentAmount",
    "thisYear",
    "this_year",
    "year1",
];

/// Candidate field names for the comparative period, in priority order.
const PREVIOUS_FIELDS: &[&str] = &[
    "previousYearAmount",
    "previous_year_amount",
    "previousYear",
    "previous_year",
    "previousAmount",
    "priorYear",
    "prior_year",
    "lastYear",
    "last_year",
    "year2",
];

/// Containers some extraction shapes nest period columns under.
const PERIOD_CONTAINERS: &[&str] = &["amounts", "values", "periods", "columns"];

pub fn candidate_fields(period: Period) -> &'static [&'static str] {
    match period {
        Period::Current => CURRENT_FIELDS,
        Period::Previous => PREVIOUS_FIELDS,
    }
}

/// Coerces a JSON value to a number. Strings get thousands separators and
/// parenthesis-negative notation normalized ("(1,234)" -> -1234); anything
/// unparseable coerces to 0.
pub fn coerce_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => {
            let n = n.as_f64().unwrap_or(0.0);
            if n.is_finite() {
                n
            } else {
                0.0
            }
        }
        Value::String(s) => parse_amount_str(s),
        _ => 0.0,
    }
}

fn parse_amount_str(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let parenthesised = trimmed.starts_with('(') && trimmed.ends_with(')');
    let inner = if parenthesised {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '\''))
        .collect();

    let parsed = cleaned.parse::<f64>().unwrap_or(0.0);
    let parsed = if parsed.is_finite() { parsed } else { 0.0 };

    if parenthesised {
        -parsed
    } else {
        parsed
    }
}

/// Extracts the amount for `period` from one raw record.
///
/// Returns the first candidate field that coerces to a non-zero number,
/// falling back one level into period-column containers. Returns `Some(0.0)`
/// only when a relevant field is present but zero, and `None` when the
/// record carries no field for the period at all.
pub fn extract_amount(record: &Value, period: Period) -> Option<f64> {
    let obj = record.as_object()?;
    let fields = candidate_fields(period);

    for name in fields {
        if let Some(value) = obj.get(*name) {
            let amount = coerce_amount(value);
            if amount != 0.0 {
                return Some(amount);
            }
        }
    }

    for container in PERIOD_CONTAINERS {
        if let Some(inner) = obj.get(*container) {
            if let Some(amount) = container_amount(inner, period) {
                if amount != 0.0 {
                    return Some(amount);
                }
            }
        }
    }

    let has_named = fields.iter().any(|name| obj.contains_key(*name));
    let has_container = PERIOD_CONTAINERS
        .iter()
        .any(|c| obj.get(*c).is_some_and(|inner| container_has_period(inner, period)));

    if has_named || has_container {
        Some(0.0)
    } else {
        None
    }
}

fn container_amount(inner: &Value, period: Period) -> Option<f64> {
    match inner {
        Value::Object(map) => {
            for name in candidate_fields(period) {
                if let Some(value) = map.get(*name) {
                    let amount = coerce_amount(value);
                    if amount != 0.0 {
                        return Some(amount);
                    }
                }
            }
            None
        }
        // Array containers carry period columns positionally: current first,
        // previous second.
        Value::Array(columns) => columns.get(period_index(period)).map(coerce_amount),
        _ => None,
    }
}

fn container_has_period(inner: &Value, period: Period) -> bool {
    match inner {
        Value::Object(map) => candidate_fields(period)
            .iter()
            .any(|name| map.contains_key(*name)),
        Value::Array(columns) => columns.len() > period_index(period),
        _ => false,
    }
}

fn period_index(period: Period) -> usize {
    match period {
        Period::Current => 0,
        Period::Previous => 1,
    }
}
