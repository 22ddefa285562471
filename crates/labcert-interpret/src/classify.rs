//! Entry points for classifying a disease on a unit.

use labcert_core::models::cell::DisplayCell;
use labcert_core::models::payload::{Pool, RawResultPayload};
use labcert_core::models::unit::Unit;
use labcert_core::models::verdict::VerdictFilter;
use tracing::debug;

use crate::pool::normalize_for;
use crate::{rules_for, Subject};

/// Display-time selections that change what a cell shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions<'a> {
    /// Sample types to restrict PCR results to. Empty means no restriction.
    pub sample_type_filter: &'a [String],
    pub verdict_filter: VerdictFilter,
}

impl ClassifyOptions<'_> {
    pub fn sample_type_selected(&self, sample_type: &str) -> bool {
        self.sample_type_filter
            .iter()
            .any(|st| st.trim().eq_ignore_ascii_case(sample_type.trim()))
    }
}

/// Classify `disease` on `unit` from its raw payload.
///
/// Returns `None` when the unit does not list the disease as an assay,
/// whatever the payload holds. An assayed disease always yields a cell,
/// possibly an empty one.
pub fn classify(
    unit: &Unit,
    disease: &str,
    payload: Option<&RawResultPayload>,
    options: &ClassifyOptions<'_>,
) -> Option<DisplayCell> {
    if !unit.has_assay(disease) {
        debug!(unit = %unit.unit_code, disease, "disease not assayed on unit");
        return None;
    }
    let pools = normalize_for(unit, payload);
    classify_pools(unit, disease, &pools, options)
}

/// Classify `disease` on `unit` from already-normalized pools, e.g. a
/// single pool of a pool-expanded table.
pub fn classify_pools(
    unit: &Unit,
    disease: &str,
    pools: &[Pool],
    options: &ClassifyOptions<'_>,
) -> Option<DisplayCell> {
    let assay = unit.assay(disease)?;
    let subject = Subject { unit, assay, pools };
    let cell = rules_for(unit.department).classify(&subject, options);
    debug!(
        unit = %unit.unit_code,
        disease,
        pools = pools.len(),
        abnormal = cell.is_abnormal,
        "classified"
    );
    Some(cell)
}

/// Whether a classified cell calls for highlighting. Absent cells never do.
pub fn is_abnormal(cell: Option<&DisplayCell>) -> bool {
    cell.is_some_and(|c| c.is_abnormal)
}
