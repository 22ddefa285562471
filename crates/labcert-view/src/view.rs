//! Row assembly.
//!
//! [`build_view`] is the whole pipeline: filter, order, choose disease
//! columns, classify every cell. The steps are public on their own so a
//! caller exporting thousands of units can select once, fix the columns,
//! and then build rows slice by slice.

use std::collections::BTreeSet;

use jiff::civil::Date;
use labcert_core::models::cell::{render_cell, DisplayCell};
use labcert_core::models::certificate::UnitRecord;
use labcert_core::models::department::Department;
use labcert_core::models::payload::Pool;
use labcert_core::models::verdict::Verdict;
use labcert_interpret::classify::{classify, classify_pools, ClassifyOptions};
use labcert_interpret::location::positive_locations;
use labcert_interpret::pool::{merge_pools, normalize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::filter::ViewFilters;
use crate::sort::sort_by_code_desc;

/// How many rows a unit contributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Layout {
    /// One row per unit.
    #[default]
    PerUnit,
    /// One row per merged pool of each PCR unit. Other departments, and
    /// PCR units without pools, still get a single row.
    PerPool,
}

/// The pool a row stands for.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PoolRef {
    pub index: usize,
    pub house_label: String,
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ViewRow {
    pub unit_id: i64,
    pub unit_code: String,
    pub department: Department,
    pub sample_code: String,
    pub date_received: Date,
    pub company: String,
    pub farm: String,
    pub flock: Option<String>,
    pub cycle: Option<String>,
    pub age: Option<String>,
    pub houses: Vec<String>,
    pub source: Option<String>,
    pub sample_types: Vec<String>,
    pub pool: Option<PoolRef>,
    /// Aligned with [`View::diseases`]. `None` where the unit does not
    /// list the disease.
    pub cells: Vec<Option<DisplayCell>>,
    pub positive_locations: Vec<String>,
    pub report_numbers: Vec<String>,
    pub certificate_files: Vec<String>,
    pub status: String,
}

impl ViewRow {
    pub fn cell(&self, column: usize) -> Option<&DisplayCell> {
        self.cells.get(column).and_then(Option::as_ref)
    }

    /// Display text of a disease cell.
    pub fn cell_text(&self, column: usize) -> String {
        render_cell(self.cell(column))
    }

    /// Whether any cell calls for highlighting.
    pub fn is_abnormal(&self) -> bool {
        self.cells.iter().flatten().any(|c| c.is_abnormal)
    }

    pub fn verdicts(&self) -> impl Iterator<Item = Verdict> + '_ {
        self.cells
            .iter()
            .flatten()
            .filter_map(DisplayCell::classified_verdict)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct View {
    /// Disease columns, in display order.
    pub diseases: Vec<String>,
    pub rows: Vec<ViewRow>,
}

/// Filter and order the records, latest unit first.
pub fn select<'a>(records: &'a [UnitRecord], filters: &ViewFilters) -> Vec<&'a UnitRecord> {
    let options = filters.classify_options();
    let mut kept: Vec<&UnitRecord> = records
        .iter()
        .filter(|record| filters.matches(record))
        .filter(|record| filters.admits_verdicts(unit_verdicts(record, &options)))
        .collect();
    sort_by_code_desc(&mut kept, |record| record.unit.unit_code.as_str());
    kept
}

/// The disease columns: the diseases selected in the filter, in selection
/// order, or else every disease assayed on the given records, sorted.
pub fn disease_columns<'a>(
    records: impl IntoIterator<Item = &'a UnitRecord>,
    filters: &ViewFilters,
) -> Vec<String> {
    if !filters.diseases.is_empty() {
        let mut seen = BTreeSet::new();
        return filters
            .diseases
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty() && seen.insert(d.to_lowercase()))
            .collect();
    }

    records
        .into_iter()
        .flat_map(|record| record.unit.assays.iter())
        .map(|assay| assay.disease.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows for already selected records, against fixed disease columns.
pub fn build_rows(
    records: &[&UnitRecord],
    diseases: &[String],
    filters: &ViewFilters,
    layout: Layout,
) -> Vec<ViewRow> {
    let options = filters.classify_options();
    records
        .iter()
        .flat_map(|record| match layout {
            Layout::PerPool if record.unit.department == Department::Pcr => {
                pool_rows(record, diseases, filters, &options)
            }
            _ => vec![unit_row(record, diseases, &options)],
        })
        .collect()
}

/// Filter, order and classify in one go.
pub fn build_view(records: &[UnitRecord], filters: &ViewFilters, layout: Layout) -> View {
    let selected = select(records, filters);
    let diseases = disease_columns(selected.iter().copied(), filters);
    let rows = build_rows(&selected, &diseases, filters, layout);

    info!(
        records = records.len(),
        units = selected.len(),
        columns = diseases.len(),
        rows = rows.len(),
        ?layout,
        "built view"
    );
    View { diseases, rows }
}

/// Verdicts of every assayed disease on the unit.
fn unit_verdicts(record: &UnitRecord, options: &ClassifyOptions<'_>) -> Vec<Verdict> {
    let unit = &record.unit;
    unit.assays
        .iter()
        .filter_map(|assay| {
            classify(unit, &assay.disease, record.payload(&assay.disease), options)
        })
        .filter_map(|cell| cell.classified_verdict())
        .collect()
}

fn unit_row(record: &UnitRecord, diseases: &[String], options: &ClassifyOptions<'_>) -> ViewRow {
    let unit = &record.unit;
    let cells = diseases
        .iter()
        .map(|column| {
            let assay = unit.assay(column)?;
            classify(unit, &assay.disease, record.payload(&assay.disease), options)
        })
        .collect();
    row(record, None, cells)
}

/// One row per merged pool. Under a verdict filter, pools whose own cells
/// carry none of the selected verdicts are dropped.
fn pool_rows(
    record: &UnitRecord,
    diseases: &[String],
    filters: &ViewFilters,
    options: &ClassifyOptions<'_>,
) -> Vec<ViewRow> {
    let unit = &record.unit;
    let per_disease: Vec<(String, Vec<Pool>)> = unit
        .assays
        .iter()
        .map(|assay| {
            let pools = normalize(record.payload(&assay.disease), &unit.sample_types);
            (assay.disease.clone(), pools)
        })
        .collect();

    let merged = merge_pools(&per_disease, &unit.houses);
    if merged.is_empty() {
        return vec![unit_row(record, diseases, options)];
    }
    debug!(unit = %unit.unit_code, pools = merged.len(), "expanding unit into pools");

    merged
        .into_iter()
        .map(|merged| {
            let cells = diseases
                .iter()
                .map(|column| {
                    let assay = unit.assay(column)?;
                    let pools = merged
                        .pools
                        .get(&assay.disease)
                        .map(std::slice::from_ref)
                        .unwrap_or_default();
                    classify_pools(unit, &assay.disease, pools, options)
                })
                .collect();
            let pool = PoolRef {
                index: merged.index,
                house_label: merged.house_label,
            };
            row(record, Some(pool), cells)
        })
        .filter(|row| filters.admits_verdicts(row.verdicts()))
        .collect()
}

fn row(record: &UnitRecord, pool: Option<PoolRef>, cells: Vec<Option<DisplayCell>>) -> ViewRow {
    let sample = &record.sample;
    let unit = &record.unit;
    let certificate = record.certificate.as_ref();

    let report_numbers = certificate
        .map(|c| {
            unit.assays
                .iter()
                .filter_map(|assay| c.report_numbers.get(&assay.disease).cloned())
                .collect()
        })
        .unwrap_or_default();
    let certificate_files = unit
        .assays
        .iter()
        .filter_map(|assay| assay.certificate_file.clone())
        .collect();
    let status = certificate
        .and_then(|c| c.status.clone())
        .or_else(|| unit.coa_status.clone())
        .unwrap_or_else(|| sample.status.clone());

    ViewRow {
        unit_id: unit.id,
        unit_code: unit.unit_code.clone(),
        department: unit.department,
        sample_code: sample.sample_code.clone(),
        date_received: sample.date_received,
        company: sample.company.clone(),
        farm: sample.farm.clone(),
        flock: sample.flock.clone(),
        cycle: sample.cycle.clone(),
        age: unit.age.clone(),
        houses: unit.houses.clone(),
        source: unit.source.clone(),
        sample_types: unit.sample_types.clone(),
        pool,
        cells,
        positive_locations: positive_locations(record),
        report_numbers,
        certificate_files,
        status,
    }
}
