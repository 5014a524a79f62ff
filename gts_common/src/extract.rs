//! Tolerant field extraction for upstream JSON payloads.
//!
//! The external gateway and supplier APIs are inconsistent about field naming and typing (numbers arrive as
//! numbers or numeric strings, success flags as booleans or status strings, and the same datum under several
//! names). Rather than scattering ad hoc field checks at each call site, callers supply an ordered list of
//! candidate paths and the first present value wins.

use serde_json::Value;

/// Walks a dotted path (e.g. `"result.amount"`) into a JSON value.
pub fn value_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

/// Extracts a number at `path`, accepting both JSON numbers and numeric strings.
pub fn number_at(value: &Value, path: &str) -> Option<f64> {
    match value_at(value, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Returns the first number found among the candidate paths, in priority order.
pub fn first_number(value: &Value, paths: &[&str]) -> Option<f64> {
    paths.iter().find_map(|p| number_at(value, p))
}

pub fn bool_at(value: &Value, path: &str) -> Option<bool> {
    value_at(value, path)?.as_bool()
}

pub fn string_at<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    value_at(value, path)?.as_str()
}
