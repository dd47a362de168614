// * Numeric Normalization
// * Display strings such as "₹ 2,45,312 Cr." or "1,179 / 536" reduced to typed values.
// * Never fails: text without a usable number passes through untouched.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use super::fields::RatioRecord;

// * Digit group with optional thousands separators and one decimal part
static PATTERN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("Invalid number regex"));

/// Result of normalizing one raw display string (serialize-only: `Range` and `Text` share a shape)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Integer(i64),
    Float(f64),
    /// "first / second", kept as display text
    Range(String),
    /// Original text, unchanged
    Text(String),
}

impl NormalizedValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NormalizedValue::Integer(v) => Some(*v as f64),
            NormalizedValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, NormalizedValue::Integer(_) | NormalizedValue::Float(_))
    }
}

impl fmt::Display for NormalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedValue::Integer(v) => write!(f, "{v}"),
            NormalizedValue::Float(v) => write!(f, "{v}"),
            NormalizedValue::Range(s) | NormalizedValue::Text(s) => f.write_str(s),
        }
    }
}

/// Normalizes one raw display string.
///
/// - "/" present and at least two numbers → `Range("first / second")`
/// - otherwise the first number, separators removed, as `Float` when it has a
///   decimal point and `Integer` otherwise
/// - no number, or a number that does not fit → `Text(raw)`
pub fn normalize(raw: &str) -> NormalizedValue {
    let numbers: Vec<&str> = PATTERN_NUMBER.find_iter(raw).map(|m| m.as_str()).collect();

    let Some(first) = numbers.first() else {
        return NormalizedValue::Text(raw.to_string());
    };

    if raw.contains('/') && numbers.len() >= 2 {
        return NormalizedValue::Range(format!("{} / {}", numbers[0], numbers[1]));
    }

    let clean = first.replace(',', "");
    let parsed = if clean.contains('.') {
        clean.parse::<f64>().ok().map(NormalizedValue::Float)
    } else {
        clean.parse::<i64>().ok().map(NormalizedValue::Integer)
    };

    parsed.unwrap_or_else(|| NormalizedValue::Text(raw.to_string()))
}

/// Normalizes every value of a ratio record, keeping labels and order
pub fn normalize_record(record: &RatioRecord) -> Vec<(String, NormalizedValue)> {
    record
        .iter()
        .map(|(label, value)| (label.to_string(), normalize(value)))
        .collect()
}
