//! Raw value parsing.
//!
//! Technicians type results as free text: CT values, "NEG.", counts in
//! scientific notation, "LESS THAN 10", organism names. [`parse`] maps every
//! string to exactly one [`ParsedValue`] and never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Anchored at the start only: a unit such as "CFU/g" may follow the count.
static SCIENTIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]?\d+(?:\.\d+)?)\s*[x*]\s*10\s*\^?\s*([+-]?\d+)")
        .expect("scientific notation pattern is valid")
});

static LESS_THAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)less\s+than\D*(\d+)").expect("less-than pattern is valid")
});

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)").expect("leading number pattern is valid")
});

/// Semantic reading of a raw lab value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum ParsedValue {
    Negative,
    NotApplicable,
    /// CT values and plain counts.
    Numeric(f64),
    /// `mantissa x 10^exponent`, resolved.
    ScientificCount(f64),
    /// "LESS THAN n". `0` when no bound was written, meaning below the
    /// minimum detectable level.
    LessThan(f64),
    /// Free text that passes through unclassified.
    Opaque(String),
}

impl ParsedValue {
    /// The numeric magnitude of numeric and scientific values.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            ParsedValue::Numeric(v) | ParsedValue::ScientificCount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, ParsedValue::Negative)
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, ParsedValue::NotApplicable)
    }
}

pub fn parse(raw: &str) -> ParsedValue {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();

    if matches!(upper.as_str(), "" | "N/A" | "NA") {
        return ParsedValue::NotApplicable;
    }
    if is_negative_marker(&upper) {
        return ParsedValue::Negative;
    }
    if let Some(rest) = strip_ct_prefix(trimmed) {
        return match parse(rest) {
            value @ (ParsedValue::Numeric(_)
            | ParsedValue::ScientificCount(_)
            | ParsedValue::Negative
            | ParsedValue::NotApplicable) => value,
            _ => ParsedValue::Opaque(raw.to_string()),
        };
    }
    if let Some(value) = scientific(trimmed) {
        return ParsedValue::ScientificCount(value);
    }
    if upper.contains("LESS THAN") {
        let bound = LESS_THAN
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        return ParsedValue::LessThan(bound);
    }
    if let Some(value) = leading_number(trimmed) {
        return ParsedValue::Numeric(value);
    }
    ParsedValue::Opaque(raw.to_string())
}

fn strip_ct_prefix(text: &str) -> Option<&str> {
    let prefix = text.get(..3)?;
    prefix
        .eq_ignore_ascii_case("ct:")
        .then(|| &text[3..])
}

fn is_negative_marker(upper: &str) -> bool {
    let stem = upper.strip_suffix('.').unwrap_or(upper);
    matches!(stem, "NEG" | "NEGATIVE")
}

fn scientific(text: &str) -> Option<f64> {
    let caps = SCIENTIFIC.captures(text)?;
    let mantissa: f64 = caps.get(1)?.as_str().parse().ok()?;
    let exponent: i32 = caps.get(2)?.as_str().parse().ok()?;
    let value = mantissa * 10f64.powi(exponent);
    value.is_finite().then_some(value)
}

fn leading_number(text: &str) -> Option<f64> {
    let run = LEADING_NUMBER.find(text)?.as_str();
    run.parse::<f64>().ok().filter(|v| v.is_finite())
}
