use labcert_core::models::cell::DisplayCell;
use labcert_core::models::department::Department;
use labcert_core::models::unit::Unit;
use labcert_core::models::verdict::Verdict;

use crate::classify::ClassifyOptions;
use crate::parse::parse;
use crate::{DepartmentRules, Subject};

/// Total bacterial count limit for water, in CFU/ml.
pub const WATER_BACTERIAL_LIMIT: f64 = 56.0;
/// Coliform / E. coli / Pseudomonas limit for water, and the default for
/// any other water test.
pub const WATER_INDICATOR_LIMIT: f64 = 1.0;
/// Total count limit for feed; reaching it is already over.
pub const FEED_TOTAL_COUNT_LIMIT: f64 = 100_000.0;
/// Total count limit for everything that is not feed.
pub const TOTAL_COUNT_LIMIT: f64 = 1_000.0;

/// Culture results that mean nothing grew, after uppercasing.
const CLEAN_RESULTS: [&str; 5] = [
    "NOT DETECTED",
    "NEGATIVE",
    "NO BACTERIAL GROWTH",
    "NO COLIFORM GROWTH",
    "NO FUNGAL GROWTH",
];

/// Microbiology: quantitative water and total-count tests are compared
/// against limits; every other test is a culture screen.
pub struct Microbiology;

/// How a microbiology disease is judged, decided from its name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiseaseFamily {
    /// Over when the highest count exceeds the limit.
    Water { limit: f64 },
    /// Over when the highest count exceeds (or, for feed, reaches) the limit.
    TotalCount { feed: bool },
    /// Detected when any entry reports growth.
    Culture,
}

impl DiseaseFamily {
    pub fn of(disease: &str, unit: &Unit) -> Self {
        let name = disease.to_lowercase();
        if name.contains("water") {
            let limit = if ["bacterial", "tbc"].iter().any(|k| name.contains(k)) {
                WATER_BACTERIAL_LIMIT
            } else {
                // coliform, e-coli, e.coli, ecoli, pseudomonas and the rest
                WATER_INDICATOR_LIMIT
            };
            DiseaseFamily::Water { limit }
        } else if name.contains("total count") {
            DiseaseFamily::TotalCount {
                feed: unit.has_sample_type_containing("feed"),
            }
        } else {
            DiseaseFamily::Culture
        }
    }

    /// Verdict over a set of raw entries. Empty entries are ignored.
    pub fn verdict<'a>(self, raws: impl IntoIterator<Item = &'a str>) -> Verdict {
        let raws = raws.into_iter().map(str::trim).filter(|r| !r.is_empty());
        match self {
            DiseaseFamily::Water { limit } => over_if(max_count(raws).is_some_and(|m| m > limit)),
            DiseaseFamily::TotalCount { feed: true } => {
                over_if(max_count(raws).is_some_and(|m| m >= FEED_TOTAL_COUNT_LIMIT))
            }
            DiseaseFamily::TotalCount { feed: false } => {
                over_if(max_count(raws).is_some_and(|m| m > TOTAL_COUNT_LIMIT))
            }
            DiseaseFamily::Culture => {
                if raws.into_iter().any(reports_growth) {
                    Verdict::Detected
                } else {
                    Verdict::NotDetected
                }
            }
        }
    }
}

impl DepartmentRules for Microbiology {
    fn department(&self) -> Department {
        Department::Microbiology
    }

    fn classify(&self, subject: &Subject<'_>, _options: &ClassifyOptions<'_>) -> DisplayCell {
        let raws: Vec<&str> = subject
            .entries()
            .map(|(_, raw)| raw)
            .filter(|raw| !raw.trim().is_empty())
            .collect();
        if raws.is_empty() {
            return DisplayCell::empty();
        }

        let family = DiseaseFamily::of(subject.disease(), subject.unit);
        DisplayCell::verdict(family.verdict(raws))
    }

    fn entry_is_abnormal(&self, unit: &Unit, disease: &str, raw: &str) -> bool {
        if raw.trim().is_empty() {
            return false;
        }
        DiseaseFamily::of(disease, unit)
            .verdict([raw])
            .is_abnormal()
    }
}

fn over_if(over: bool) -> Verdict {
    if over {
        Verdict::OverLimit
    } else {
        Verdict::WithinLimit
    }
}

fn max_count<'a>(raws: impl Iterator<Item = &'a str>) -> Option<f64> {
    raws.filter_map(|raw| parse(raw).numeric())
        .reduce(f64::max)
}

fn reports_growth(raw: &str) -> bool {
    let upper = raw.trim().to_uppercase();
    !upper.is_empty() && !upper.contains("LESS THAN") && !CLEAN_RESULTS.contains(&upper.as_str())
}
