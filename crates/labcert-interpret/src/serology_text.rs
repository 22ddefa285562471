//! Serology certificate text extraction.
//!
//! Serology results arrive as instrument certificates. Given the text of
//! each page, this detects which disease the page reports and pulls out the
//! mean titer, CV%, minimum and maximum.

use std::sync::LazyLock;

use labcert_core::models::unit::SerologySummary;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

const UNKNOWN_DISEASE: &str = "Unknown";

/// Diseases recognised on certificates.
const DISEASES: [&str; 23] = [
    "FAV1", "MS", "MG", "MPV", "IBD", "IBV", "REO", "ILT", "ILT GB", "ILT GI", "AIV H9",
    "AIV H5", "ND LASOTA", "AEV", "ASTRO", "CASTV", "CAV", "AE", "LLAB", "FLUH5", "EDS",
    "NDV", "ND",
];

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("serology extraction pattern is valid")
}

static MEAN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)(?:MEAN\s*TITER|MEAN)\s*[:\-]?\s*([\d,\.]+)"));
static CV: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)(?:CV%|%CV|% CV|CV %)\s*[:\-]?\s*([\d,\.]+)"));
static MIN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bMIN(?:IMUM)?\b\s*:?\s*(\d+(?:[.,]\d+)?)"));
static MAX: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bMAX(?:IMUM)?\b\s*:?\s*(\d+(?:[.,]\d+)?)"));
static MIN_MAX: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)MIN-MAX\s*TITER\s*[:\-]?\s*(\d+)\s*-\s*(\d+)"));

static AIV_SUBTYPE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bAIV[\s\-_]*H\s*(\d+)"));
static ND_LASOTA: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bND[\s\-_]*LASOTA\b"));

/// Disease patterns, longest name first so that "ILT GB" wins over "ILT".
static DISEASE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    let mut names = DISEASES.to_vec();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    names
        .into_iter()
        .map(|name| {
            let tokens: Vec<String> = name.split_whitespace().map(regex::escape).collect();
            let body = tokens.join(r"[\s\-_]*");
            (name, pattern(&format!(r"(?:^|[^\w]){body}[A-Z0-9/_-]*")))
        })
        .collect()
});

/// What one certificate page reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedSerology {
    pub disease: String,
    pub summary: SerologySummary,
}

/// The disease a certificate page reports, if recognisable.
pub fn detect_disease(text: &str) -> Option<String> {
    let upper = text.to_uppercase();

    if let Some(caps) = AIV_SUBTYPE.captures(&upper) {
        return Some(format!("AIV H{}", &caps[1]));
    }
    if ND_LASOTA.is_match(&upper) {
        return Some("ND LASOTA".to_string());
    }
    DISEASE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&upper))
        .map(|(name, _)| name.to_string())
}

/// Extract the statistics of one page. Returns `None` when the page holds
/// none of them.
pub fn extract_page(text: &str) -> Option<ExtractedSerology> {
    let mut minimum = capture(&MIN, text);
    let mut maximum = capture(&MAX, text);
    if (minimum.is_none() || maximum.is_none())
        && let Some(caps) = MIN_MAX.captures(text)
    {
        minimum = Some(caps[1].to_string());
        maximum = Some(caps[2].to_string());
    }

    let summary = SerologySummary {
        mean: capture(&MEAN, text).and_then(|v| to_number(&v)),
        cv: capture(&CV, text).and_then(|v| to_number(&v)),
        min: minimum.and_then(|v| to_number(&v)),
        max: maximum.and_then(|v| to_number(&v)),
    };
    if summary.is_empty() {
        return None;
    }

    let disease = detect_disease(text).unwrap_or_else(|| UNKNOWN_DISEASE.to_string());
    debug!(disease, fields = summary.field_count(), "extracted serology page");
    Some(ExtractedSerology { disease, summary })
}

/// Extract every page and keep, per disease, the page reporting the most
/// statistics. Order follows the first appearance of each disease.
pub fn extract_certificate<'a>(pages: impl IntoIterator<Item = &'a str>) -> Vec<ExtractedSerology> {
    let mut kept: Vec<ExtractedSerology> = Vec::new();
    for page in pages.into_iter().filter_map(extract_page) {
        match kept.iter_mut().find(|k| k.disease == page.disease) {
            Some(existing) if page.summary.field_count() > existing.summary.field_count() => {
                *existing = page;
            }
            Some(_) => {}
            None => kept.push(page),
        }
    }
    kept
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a number, dropping thousands separators.
fn to_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse().ok()
}
