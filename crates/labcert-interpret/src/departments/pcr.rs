use labcert_core::models::cell::{format_number, CellContent, DisplayCell, NEGATIVE_DISPLAY};
use labcert_core::models::department::Department;
use labcert_core::models::verdict::{Verdict, VerdictFilter};

use crate::classify::ClassifyOptions;
use crate::parse::{parse, ParsedValue};
use crate::{DepartmentRules, Subject};

/// Sample-type keys that hold the positive control lane, compared
/// case-insensitively.
const CONTROL_KEYS: [&str; 3] = ["POS. CONTROL", "POS CONTROL", "POS_CONTROL"];

/// PCR: lowest CT wins. A lower cycle threshold is a stronger signal, so the
/// lowest numeric entry across the selected pools represents the disease.
pub struct Pcr;

impl DepartmentRules for Pcr {
    fn department(&self) -> Department {
        Department::Pcr
    }

    fn classify(&self, subject: &Subject<'_>, options: &ClassifyOptions<'_>) -> DisplayCell {
        let entries = gather(subject);

        if options.sample_type_filter.is_empty() {
            representative(&entries, options.verdict_filter)
        } else {
            first_selected(&entries, options)
        }
    }
}

struct Entry<'a> {
    sample_type: &'a str,
    raw: &'a str,
    parsed: ParsedValue,
}

fn is_control_key(key: &str) -> bool {
    let key = key.trim();
    CONTROL_KEYS.iter().any(|c| c.eq_ignore_ascii_case(key))
}

fn gather<'a>(subject: &'a Subject<'_>) -> Vec<Entry<'a>> {
    subject
        .entries()
        .filter(|(key, _)| !is_control_key(key))
        .map(|(sample_type, raw)| Entry {
            sample_type,
            raw,
            parsed: parse(raw),
        })
        .filter(|e| !e.parsed.is_not_applicable())
        .collect()
}

/// With a sample-type filter: the first matching entry is shown as entered,
/// without any tie-break.
fn first_selected(entries: &[Entry<'_>], options: &ClassifyOptions<'_>) -> DisplayCell {
    let Some(entry) = entries
        .iter()
        .find(|e| options.sample_type_selected(e.sample_type))
    else {
        return DisplayCell::empty();
    };

    let verdict = if entry.parsed.numeric().is_some() {
        Some(Verdict::Positive)
    } else if entry.parsed.is_negative() {
        Some(Verdict::Negative)
    } else {
        None
    };

    let admitted = match options.verdict_filter {
        VerdictFilter::All => true,
        VerdictFilter::Only(wanted) => verdict == Some(wanted),
    };
    if !admitted {
        return DisplayCell::empty();
    }

    DisplayCell {
        content: CellContent::Representative {
            value: entry.raw.trim().to_string(),
            sample_type: None,
            verdict,
        },
        is_abnormal: verdict == Some(Verdict::Positive),
    }
}

/// Without a filter: the lowest numeric entry, labelled with its sample type
/// when more than one numeric entry competed; otherwise "NEG." when any
/// entry was negative.
fn representative(entries: &[Entry<'_>], filter: VerdictFilter) -> DisplayCell {
    let numeric: Vec<(&str, f64)> = entries
        .iter()
        .filter_map(|e| e.parsed.numeric().map(|v| (e.sample_type, v)))
        .collect();
    let any_negative = entries.iter().any(|e| e.parsed.is_negative());

    // `min_by` keeps the first of equal elements.
    let winner = numeric
        .iter()
        .copied()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(sample_type, value)| positive_cell(sample_type, value, numeric.len() > 1));

    let negative = any_negative.then(negative_cell);

    let cell = match filter {
        VerdictFilter::All => winner.or(negative),
        VerdictFilter::Only(Verdict::Positive) => winner,
        VerdictFilter::Only(Verdict::Negative) => negative,
        VerdictFilter::Only(_) => None,
    };
    cell.unwrap_or_else(DisplayCell::empty)
}

fn positive_cell(sample_type: &str, value: f64, labelled: bool) -> DisplayCell {
    DisplayCell {
        content: CellContent::Representative {
            value: format_number(value),
            sample_type: labelled.then(|| sample_type.to_string()),
            verdict: Some(Verdict::Positive),
        },
        is_abnormal: true,
    }
}

fn negative_cell() -> DisplayCell {
    DisplayCell {
        content: CellContent::Representative {
            value: NEGATIVE_DISPLAY.to_string(),
            sample_type: None,
            verdict: Some(Verdict::Negative),
        },
        is_abnormal: false,
    }
}
