use std::collections::BTreeMap;

use labcert_core::models::cell::ABSENT;
use labcert_view::view::ViewRow;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Keys of the columns that may be hidden, in table order. The first group
/// sits between the identity columns and the diseases, the second after
/// the diseases.
pub const LEADING_OPTIONAL: [&str; 7] = [
    "flock",
    "cycle",
    "age",
    "house",
    "source",
    "sample_type",
    "pool",
];

pub const TRAILING_OPTIONAL: [&str; 4] = ["positive_locations", "report_no", "certificate", "status"];

/// Which optional columns an export shows. Keys missing from the mapping
/// are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibleColumns(BTreeMap<String, bool>);

impl Default for VisibleColumns {
    fn default() -> Self {
        Self(
            LEADING_OPTIONAL
                .iter()
                .chain(TRAILING_OPTIONAL.iter())
                .map(|key| (key.to_string(), true))
                .collect(),
        )
    }
}

impl VisibleColumns {
    pub fn is_visible(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(true)
    }

    pub fn set(&mut self, key: &str, visible: bool) -> Result<(), ExportError> {
        if !is_optional(key) {
            return Err(ExportError::UnknownColumn(key.to_string()));
        }
        self.0.insert(key.to_string(), visible);
        Ok(())
    }

    /// Reject keys that name no optional column.
    pub fn validate(&self) -> Result<(), ExportError> {
        match self.0.keys().find(|key| !is_optional(key)) {
            Some(key) => Err(ExportError::UnknownColumn(key.clone())),
            None => Ok(()),
        }
    }
}

impl From<BTreeMap<String, bool>> for VisibleColumns {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

fn is_optional(key: &str) -> bool {
    LEADING_OPTIONAL
        .iter()
        .chain(TRAILING_OPTIONAL.iter())
        .any(|k| *k == key)
}

/// One column of an export table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    UnitCode,
    SampleCode,
    DateReceived,
    Company,
    Farm,
    Flock,
    Cycle,
    Age,
    House,
    Source,
    SampleType,
    Pool,
    /// Index into the view's disease columns.
    Disease(usize),
    PositiveLocations,
    ReportNo,
    Certificate,
    Status,
}

const IDENTITY: [Column; 5] = [
    Column::UnitCode,
    Column::SampleCode,
    Column::DateReceived,
    Column::Company,
    Column::Farm,
];

impl Column {
    fn optional(key: &str) -> Option<Self> {
        Some(match key {
            "flock" => Column::Flock,
            "cycle" => Column::Cycle,
            "age" => Column::Age,
            "house" => Column::House,
            "source" => Column::Source,
            "sample_type" => Column::SampleType,
            "pool" => Column::Pool,
            "positive_locations" => Column::PositiveLocations,
            "report_no" => Column::ReportNo,
            "certificate" => Column::Certificate,
            "status" => Column::Status,
            _ => return None,
        })
    }

    pub fn header(self, diseases: &[String]) -> String {
        let label = match self {
            Column::UnitCode => "Unit Code",
            Column::SampleCode => "Sample Code",
            Column::DateReceived => "Date Received",
            Column::Company => "Company",
            Column::Farm => "Farm",
            Column::Flock => "Flock",
            Column::Cycle => "Cycle",
            Column::Age => "Age",
            Column::House => "House",
            Column::Source => "Source",
            Column::SampleType => "Sample Type",
            Column::Pool => "Pool",
            Column::Disease(i) => return diseases.get(i).cloned().unwrap_or_default(),
            Column::PositiveLocations => "Positive Locations",
            Column::ReportNo => "Report No.",
            Column::Certificate => "Certificate",
            Column::Status => "Status",
        };
        label.to_string()
    }

    /// Text of this column for one row. Missing values show as a dash.
    pub fn value(self, row: &ViewRow) -> String {
        match self {
            Column::UnitCode => row.unit_code.clone(),
            Column::SampleCode => row.sample_code.clone(),
            Column::DateReceived => row.date_received.to_string(),
            Column::Company => row.company.clone(),
            Column::Farm => row.farm.clone(),
            Column::Flock => text(row.flock.as_deref()),
            Column::Cycle => text(row.cycle.as_deref()),
            Column::Age => text(row.age.as_deref()),
            Column::House => match &row.pool {
                Some(pool) => text(Some(pool.house_label.as_str())),
                None => joined(&row.houses),
            },
            Column::Source => text(row.source.as_deref()),
            Column::SampleType => joined(&row.sample_types),
            Column::Pool => row
                .pool
                .as_ref()
                .map(|pool| (pool.index + 1).to_string())
                .unwrap_or_else(|| ABSENT.to_string()),
            Column::Disease(i) => row.cell_text(i),
            Column::PositiveLocations => joined(&row.positive_locations),
            Column::ReportNo => joined(&row.report_numbers),
            Column::Certificate => joined(&row.certificate_files),
            Column::Status => text(Some(row.status.as_str())),
        }
    }
}

/// The columns of an export, in order.
pub fn layout(disease_count: usize, visible: &VisibleColumns) -> Vec<Column> {
    let gated = |keys: &[&str]| -> Vec<Column> {
        keys.iter()
            .filter(|key| visible.is_visible(key))
            .filter_map(|key| Column::optional(key))
            .collect()
    };

    let mut columns = IDENTITY.to_vec();
    columns.extend(gated(&LEADING_OPTIONAL));
    columns.extend((0..disease_count).map(Column::Disease));
    columns.extend(gated(&TRAILING_OPTIONAL));
    columns
}

fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ABSENT)
        .to_string()
}

fn joined(values: &[String]) -> String {
    let parts: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if parts.is_empty() {
        ABSENT.to_string()
    } else {
        parts.join(", ")
    }
}
