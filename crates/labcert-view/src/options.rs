//! Values offered in the filter dropdowns.

use std::collections::BTreeSet;

use labcert_core::models::certificate::UnitRecord;
use labcert_core::models::department::Department;
use serde::Serialize;
use ts_rs::TS;

/// Sorted, de-duplicated, non-empty values present in a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct FilterOptions {
    pub companies: Vec<String>,
    pub farms: Vec<String>,
    pub flocks: Vec<String>,
    pub cycles: Vec<String>,
    pub ages: Vec<String>,
    pub sources: Vec<String>,
    pub sample_types: Vec<String>,
    pub diseases: Vec<String>,
    pub kit_types: Vec<String>,
}

#[derive(Default)]
struct Collector(BTreeSet<String>);

impl Collector {
    fn add(&mut self, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.insert(value.to_string());
        }
    }

    fn finish(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

/// Collect the filter options, optionally only from one department's units.
pub fn filter_options(records: &[UnitRecord], department: Option<Department>) -> FilterOptions {
    let mut companies = Collector::default();
    let mut farms = Collector::default();
    let mut flocks = Collector::default();
    let mut cycles = Collector::default();
    let mut ages = Collector::default();
    let mut sources = Collector::default();
    let mut sample_types = Collector::default();
    let mut diseases = Collector::default();
    let mut kit_types = Collector::default();

    for record in records
        .iter()
        .filter(|r| department.is_none_or(|d| d == r.unit.department))
    {
        let sample = &record.sample;
        let unit = &record.unit;

        companies.add(Some(&sample.company));
        farms.add(Some(&sample.farm));
        flocks.add(sample.flock.as_deref());
        cycles.add(sample.cycle.as_deref());
        ages.add(unit.age.as_deref());
        sources.add(unit.source.as_deref());
        for sample_type in &unit.sample_types {
            sample_types.add(Some(sample_type));
        }
        for assay in &unit.assays {
            diseases.add(Some(&assay.disease));
            kit_types.add(assay.kit_type.as_deref());
        }
    }

    FilterOptions {
        companies: companies.finish(),
        farms: farms.finish(),
        flocks: flocks.finish(),
        cycles: cycles.finish(),
        ages: ages.finish(),
        sources: sources.finish(),
        sample_types: sample_types.finish(),
        diseases: diseases.finish(),
        kit_types: kit_types.finish(),
    }
}
