//! Result statistics over a filtered record set.
//!
//! Positives and negatives are counted from the classified cells, so the
//! statistics always agree with what the tables show.

use std::collections::{BTreeMap, BTreeSet};

use labcert_core::models::cell::DisplayCell;
use labcert_core::models::certificate::UnitRecord;
use labcert_core::models::department::Department;
use labcert_core::models::unit::{DiseaseAssay, Unit};
use labcert_core::models::verdict::Verdict;
use labcert_interpret::classify::{classify, ClassifyOptions};
use labcert_interpret::location::positive_locations;
use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use crate::filter::ViewFilters;
use crate::view::select;

const UNKNOWN: &str = "Unknown";

/// Counts for one disease tested with one kit.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DiseaseStat {
    pub disease: String,
    /// `"Unknown"` when no kit was recorded.
    pub kit_type: String,
    pub test_count: u32,
    pub positive_count: u32,
    pub negative_count: u32,
}

impl DiseaseStat {
    /// Positives as a percentage of tests, to one decimal.
    pub fn positivity_rate(&self) -> f64 {
        percentage(self.positive_count, self.test_count)
    }
}

/// Microbiology units grouped by what was sampled.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SampleTypeStat {
    /// The unit's sample types joined with ", ".
    pub sample_type: String,
    pub total_count: u32,
    /// Units with at least one abnormal result.
    pub above_limit_count: u32,
    pub positive_locations: Vec<String>,
    pub percentage: f64,
}

/// A PCR unit with at least one positive disease, for the per-company pivot.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PcrPositiveSample {
    pub unit_code: String,
    pub farm: String,
    pub age: Option<String>,
    /// The unit's houses joined with ", ".
    pub house: String,
    /// Disease → the value shown for it.
    pub diseases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CompanyStat {
    pub company: String,
    /// Distinct samples.
    pub sample_count: u32,
    /// Sum of the units' recorded sample numbers.
    pub sub_sample_count: u32,
    pub test_count: u32,
    /// Department code → units.
    pub departments: BTreeMap<String, u32>,
    /// In record order.
    pub pcr_positive_samples: Vec<PcrPositiveSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ResultStats {
    pub total_tests: u32,
    pub total_positive: u32,
    pub total_negative: u32,
    /// Most tested first.
    pub diseases: Vec<DiseaseStat>,
    /// Largest group first.
    pub microbiology: Vec<SampleTypeStat>,
    /// By company name.
    pub companies: Vec<CompanyStat>,
}

impl ResultStats {
    pub fn positivity_rate(&self) -> f64 {
        percentage(self.total_positive, self.total_tests)
    }
}

#[derive(Default)]
struct SampleTypeTally {
    total: u32,
    above_limit: u32,
    locations: Vec<String>,
}

#[derive(Default)]
struct CompanyTally {
    samples: BTreeSet<i64>,
    stat: CompanyStat,
}

/// Tests an assay accounts for. Microbiology runs every disease once per
/// recorded sample; the other departments carry their own count.
pub fn assay_tests(unit: &Unit, assay: &DiseaseAssay) -> u32 {
    match unit.department {
        Department::Microbiology => unit.samples_number.unwrap_or(0),
        Department::Pcr | Department::Serology => assay.tests(),
    }
}

/// Statistics over the records the filters select. Cells are classified
/// without display restrictions.
pub fn result_stats(records: &[UnitRecord], filters: &ViewFilters) -> ResultStats {
    let options = ClassifyOptions::default();
    let mut diseases: BTreeMap<(String, String), DiseaseStat> = BTreeMap::new();
    let mut sample_types: BTreeMap<String, SampleTypeTally> = BTreeMap::new();
    let mut companies: BTreeMap<String, CompanyTally> = BTreeMap::new();
    let mut stats = ResultStats::default();

    let selected = select(records, filters);
    for record in &selected {
        let unit = &record.unit;
        let mut any_abnormal = false;
        let mut pcr_positives: BTreeMap<String, String> = BTreeMap::new();

        let company = companies.entry(record.sample.company.clone()).or_default();
        company.samples.insert(record.sample.id);
        company.stat.sub_sample_count = company
            .stat
            .sub_sample_count
            .saturating_add(unit.samples_number.unwrap_or(0));
        let units = company
            .stat
            .departments
            .entry(unit.department.code().to_string())
            .or_default();
        *units = units.saturating_add(1);

        for assay in &unit.assays {
            let kit_type = assay
                .kit_type
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string();
            let stat = diseases
                .entry((assay.disease.clone(), kit_type.clone()))
                .or_insert_with(|| DiseaseStat {
                    disease: assay.disease.clone(),
                    kit_type,
                    test_count: 0,
                    positive_count: 0,
                    negative_count: 0,
                });
            let tests = assay_tests(unit, assay);
            stat.test_count = stat.test_count.saturating_add(tests);
            stats.total_tests = stats.total_tests.saturating_add(tests);
            company.stat.test_count = company.stat.test_count.saturating_add(tests);

            let cell = classify(unit, &assay.disease, record.payload(&assay.disease), &options);
            match cell.as_ref().and_then(DisplayCell::classified_verdict) {
                Some(verdict) if verdict.is_abnormal() => {
                    stat.positive_count = stat.positive_count.saturating_add(1);
                    stats.total_positive = stats.total_positive.saturating_add(1);
                    any_abnormal = true;
                    if let Some(cell) = &cell
                        && unit.department == Department::Pcr
                    {
                        pcr_positives.insert(assay.disease.clone(), cell.text());
                    }
                }
                Some(Verdict::Negative | Verdict::NotDetected | Verdict::WithinLimit) => {
                    stat.negative_count = stat.negative_count.saturating_add(1);
                    stats.total_negative = stats.total_negative.saturating_add(1);
                }
                _ => {}
            }
        }

        if !pcr_positives.is_empty() {
            company.stat.pcr_positive_samples.push(PcrPositiveSample {
                unit_code: unit.unit_code.clone(),
                farm: record.sample.farm.clone(),
                age: unit.age.clone(),
                house: unit.houses.join(", "),
                diseases: pcr_positives,
            });
        }

        if unit.department == Department::Microbiology {
            let label = if unit.sample_types.is_empty() {
                UNKNOWN.to_string()
            } else {
                unit.sample_types.join(", ")
            };
            let tally = sample_types.entry(label).or_default();
            tally.total = tally.total.saturating_add(1);
            if any_abnormal {
                tally.above_limit = tally.above_limit.saturating_add(1);
            }
            for location in positive_locations(record) {
                if !tally.locations.contains(&location) {
                    tally.locations.push(location);
                }
            }
        }
    }

    stats.diseases = diseases.into_values().collect();
    stats.diseases.sort_by_key(|d| std::cmp::Reverse(d.test_count));

    stats.microbiology = sample_types
        .into_iter()
        .map(|(sample_type, tally)| SampleTypeStat {
            sample_type,
            total_count: tally.total,
            above_limit_count: tally.above_limit,
            positive_locations: tally.locations,
            percentage: percentage(tally.above_limit, tally.total),
        })
        .collect();
    stats.microbiology.sort_by_key(|s| std::cmp::Reverse(s.total_count));

    stats.companies = companies
        .into_iter()
        .map(|(name, tally)| CompanyStat {
            company: name,
            sample_count: u32::try_from(tally.samples.len()).unwrap_or(u32::MAX),
            ..tally.stat
        })
        .collect();

    info!(
        units = selected.len(),
        tests = stats.total_tests,
        positive = stats.total_positive,
        negative = stats.total_negative,
        companies = stats.companies.len(),
        "computed result statistics"
    );
    stats
}

/// `part / whole` as a percentage rounded to one decimal; 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (f64::from(part) / f64::from(whole) * 1000.0).round() / 10.0
}
