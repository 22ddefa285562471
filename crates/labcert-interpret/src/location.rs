//! Abnormal-location derivation.
//!
//! Microbiology results are keyed by location index (`"3"`, or `"3_a"` for
//! a second reading at the same location). Indices whose entry is abnormal
//! on its own are mapped back to the unit's location names.

use std::collections::BTreeSet;

use labcert_core::models::certificate::UnitRecord;
use labcert_core::models::payload::RawResultPayload;
use labcert_core::models::unit::Unit;

use crate::pool::normalize_entries;
use crate::rules_for;

/// The 1-based location index encoded in a result key, if any.
pub fn parse_location_index(key: &str) -> Option<usize> {
    let base = key.trim().split('_').next()?;
    if base.is_empty() || !base.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    base.parse().ok()
}

/// Indices of the entries of one disease that are abnormal in isolation,
/// skipping hidden ones. A key is hidden when the hidden list names either
/// the key itself or its base index.
pub fn abnormal_indices(
    unit: &Unit,
    disease: &str,
    payload: Option<&RawResultPayload>,
    hidden: &[String],
) -> BTreeSet<usize> {
    let rules = rules_for(unit.department);
    let pools = normalize_entries(payload);

    pools
        .iter()
        .flat_map(|pool| pool.values.iter())
        .filter_map(|(key, raw)| {
            let index = parse_location_index(key)?;
            let index_text = index.to_string();
            let is_hidden = hidden
                .iter()
                .any(|h| h.trim() == key.trim() || h.trim() == index_text);
            (!is_hidden && rules.entry_is_abnormal(unit, disease, raw)).then_some(index)
        })
        .collect()
}

/// Map 1-based indices to location names. Indices without a name fall back
/// to `"Sample <n>"`.
pub fn resolve_location_names(
    indices: impl IntoIterator<Item = usize>,
    names: &[String],
) -> Vec<String> {
    indices
        .into_iter()
        .map(|index| {
            index
                .checked_sub(1)
                .and_then(|i| names.get(i))
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Sample {index}"))
        })
        .collect()
}

/// Abnormal locations of a unit across all of its assayed diseases, in
/// index order and without duplicates.
pub fn positive_locations(record: &UnitRecord) -> Vec<String> {
    let unit = &record.unit;
    let Some(certificate) = record.certificate.as_ref() else {
        return Vec::new();
    };

    let indices: BTreeSet<usize> = unit
        .assays
        .iter()
        .flat_map(|assay| {
            abnormal_indices(
                unit,
                &assay.disease,
                certificate.payload(&assay.disease),
                certificate.hidden(&assay.disease),
            )
        })
        .collect();

    resolve_location_names(indices, &unit.location_names)
}
