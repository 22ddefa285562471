//! Record filters.
//!
//! Categories combine with AND; the values selected within one category
//! combine with OR. An empty category places no constraint, and a value
//! that appears nowhere in the data simply matches nothing.

use jiff::civil::Date;
use labcert_core::models::certificate::UnitRecord;
use labcert_core::models::department::Department;
use labcert_core::models::verdict::{Verdict, VerdictFilter};
use labcert_interpret::classify::ClassifyOptions;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Filter selections as made in the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ViewFilters {
    pub companies: Vec<String>,
    pub farms: Vec<String>,
    pub flocks: Vec<String>,
    pub cycles: Vec<String>,
    pub ages: Vec<String>,
    pub sources: Vec<String>,
    pub sample_types: Vec<String>,
    /// Also the disease columns of the view, in this order.
    pub diseases: Vec<String>,
    pub kit_types: Vec<String>,
    /// Inclusive lower bound on the date received.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the date received.
    pub date_to: Option<Date>,
    pub department: Option<Department>,
    /// A unit matches when any of its diseases classifies into one of
    /// these verdicts.
    pub verdicts: Vec<Verdict>,
}

impl ViewFilters {
    /// Whether any category is constrained.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The per-cell verdict filter. A single selected verdict narrows what
    /// PCR cells show; none or several leave cells unrestricted.
    pub fn cell_verdict_filter(&self) -> VerdictFilter {
        match self.verdicts.as_slice() {
            [only] => VerdictFilter::Only(*only),
            _ => VerdictFilter::All,
        }
    }

    /// Options every cell of the view is classified with.
    pub fn classify_options(&self) -> ClassifyOptions<'_> {
        ClassifyOptions {
            sample_type_filter: &self.sample_types,
            verdict_filter: self.cell_verdict_filter(),
        }
    }

    /// Every category except verdicts. Verdicts need classification and
    /// are checked by the view itself.
    pub fn matches(&self, record: &UnitRecord) -> bool {
        let sample = &record.sample;
        let unit = &record.unit;

        selected(&self.companies, Some(&sample.company))
            && selected(&self.farms, Some(&sample.farm))
            && selected(&self.flocks, sample.flock.as_deref())
            && selected(&self.cycles, sample.cycle.as_deref())
            && selected(&self.ages, unit.age.as_deref())
            && selected(&self.sources, unit.source.as_deref())
            && any_selected(&self.sample_types, unit.sample_types.iter().map(String::as_str))
            && any_selected(&self.diseases, unit.assays.iter().map(|a| a.disease.as_str()))
            && any_selected(
                &self.kit_types,
                unit.assays.iter().filter_map(|a| a.kit_type.as_deref()),
            )
            && self.date_from.is_none_or(|from| sample.date_received >= from)
            && self.date_to.is_none_or(|to| sample.date_received <= to)
            && self.department.is_none_or(|d| d == unit.department)
    }

    /// Whether a unit with the given cell verdicts passes the verdict
    /// category.
    pub fn admits_verdicts(&self, verdicts: impl IntoIterator<Item = Verdict>) -> bool {
        self.verdicts.is_empty() || verdicts.into_iter().any(|v| self.verdicts.contains(&v))
    }
}

fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn selected(wanted: &[String], value: Option<&str>) -> bool {
    if wanted.is_empty() {
        return true;
    }
    value.is_some_and(|v| wanted.iter().any(|w| same(w, v)))
}

fn any_selected<'a>(wanted: &[String], mut values: impl Iterator<Item = &'a str>) -> bool {
    wanted.is_empty() || values.any(|v| wanted.iter().any(|w| same(w, v)))
}
