use labcert_core::models::cell::{CellContent, DisplayCell};
use labcert_core::models::department::Department;

use crate::classify::ClassifyOptions;
use crate::{DepartmentRules, Subject};

/// Serology: no verdict. The recorded summary statistics and the uploaded
/// certificate are surfaced as they are.
pub struct Serology;

impl DepartmentRules for Serology {
    fn department(&self) -> Department {
        Department::Serology
    }

    fn classify(&self, subject: &Subject<'_>, _options: &ClassifyOptions<'_>) -> DisplayCell {
        let assay = subject.assay;
        if assay.summary.is_none() && assay.certificate_file.is_none() {
            return DisplayCell::empty();
        }
        DisplayCell {
            content: CellContent::Serology {
                summary: assay.summary.unwrap_or_default(),
                certificate_file: assay.certificate_file.clone(),
            },
            is_abnormal: false,
        }
    }
}
