//! labcert-interpret
//!
//! Result interpretation rules. Pure functions over already-fetched data
//! with no I/O and no shared state. Raw lab values are parsed, result
//! payloads normalized into pools, and each assayed disease classified into
//! a display cell by its department's rules.

pub mod classify;
pub mod departments;
pub mod location;
pub mod parse;
pub mod pool;
pub mod serology_text;

use labcert_core::models::cell::DisplayCell;
use labcert_core::models::department::Department;
use labcert_core::models::payload::Pool;
use labcert_core::models::unit::{DiseaseAssay, Unit};

use classify::ClassifyOptions;

/// One assayed disease on one unit, with the pools selected for display.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub unit: &'a Unit,
    pub assay: &'a DiseaseAssay,
    pub pools: &'a [Pool],
}

impl Subject<'_> {
    pub fn disease(&self) -> &str {
        &self.assay.disease
    }

    /// Every `(key, raw value)` pair across the selected pools, in pool order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pools
            .iter()
            .flat_map(|pool| pool.values.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Trait implemented by each department's interpretation rules.
pub trait DepartmentRules: Send + Sync {
    fn department(&self) -> Department;

    /// Classify one assayed disease into a display cell.
    fn classify(&self, subject: &Subject<'_>, options: &ClassifyOptions<'_>) -> DisplayCell;

    /// Whether a single raw entry would be flagged abnormal on its own.
    /// Used to locate abnormal results; departments without per-entry
    /// verdicts never flag.
    fn entry_is_abnormal(&self, _unit: &Unit, _disease: &str, _raw: &str) -> bool {
        false
    }
}

/// Return the rules of every department.
pub fn all_departments() -> Vec<&'static dyn DepartmentRules> {
    vec![
        &departments::pcr::Pcr,
        &departments::serology::Serology,
        &departments::microbiology::Microbiology,
    ]
}

/// Look up the rules for a department.
pub fn rules_for(department: Department) -> &'static dyn DepartmentRules {
    match department {
        Department::Pcr => &departments::pcr::Pcr,
        Department::Serology => &departments::serology::Serology,
        Department::Microbiology => &departments::microbiology::Microbiology,
    }
}
