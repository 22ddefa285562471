//! Pool normalization.
//!
//! Every consumer works on an ordered list of [`Pool`]s, whichever shape the
//! results were stored in.

use std::collections::BTreeMap;

use labcert_core::models::department::Department;
use labcert_core::models::payload::{LegacyPayload, Pool, RawResultPayload, ResultValues};
use labcert_core::models::unit::Unit;
use serde::Serialize;
use ts_rs::TS;

/// Canonical pools for a disease.
///
/// The legacy shape becomes a single unlabelled pool holding one value per
/// known sample type (missing ones as empty strings). Pooled payloads pass
/// through in their recorded order. No payload means no pools.
pub fn normalize(payload: Option<&RawResultPayload>, sample_types: &[String]) -> Vec<Pool> {
    match payload {
        None => Vec::new(),
        Some(RawResultPayload::Pooled(pools)) => pools.clone(),
        Some(RawResultPayload::Legacy(legacy)) => {
            let values = sample_types
                .iter()
                .map(|st| {
                    let value = legacy.entries.get(st).cloned().unwrap_or_default();
                    (st.clone(), value)
                })
                .collect();
            vec![legacy_pool(legacy, values)]
        }
    }
}

/// Like [`normalize`], but a legacy payload keeps every result entry rather
/// than only the unit's sample types. Microbiology results are keyed by
/// location index, not by sample type.
pub fn normalize_entries(payload: Option<&RawResultPayload>) -> Vec<Pool> {
    match payload {
        None => Vec::new(),
        Some(RawResultPayload::Pooled(pools)) => pools.clone(),
        Some(RawResultPayload::Legacy(legacy)) => {
            let values = legacy
                .result_entries()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            vec![legacy_pool(legacy, values)]
        }
    }
}

/// The normalization appropriate for the unit's department.
pub fn normalize_for(unit: &Unit, payload: Option<&RawResultPayload>) -> Vec<Pool> {
    match unit.department {
        Department::Microbiology => normalize_entries(payload),
        Department::Pcr | Department::Serology => normalize(payload, &unit.sample_types),
    }
}

fn legacy_pool(legacy: &LegacyPayload, values: ResultValues) -> Pool {
    Pool {
        values,
        positive_control: legacy.positive_control().unwrap_or_default().to_string(),
        ..Pool::default()
    }
}

/// One physical pool across every disease of a unit.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct MergedPool {
    pub index: usize,
    pub house_label: String,
    /// Disease → that disease's pool at this index. Diseases with fewer
    /// pools are missing from the higher indices.
    pub pools: BTreeMap<String, Pool>,
}

/// Align pools index-wise across diseases.
///
/// Pool `i` of every disease is the same physical pool. Its label is the
/// first non-empty label any disease recorded at `i` (in the given disease
/// order); without one, the unit's houses are used: all of them joined when
/// there is a single pool, `houses[i]` otherwise.
pub fn merge_pools(per_disease: &[(String, Vec<Pool>)], unit_houses: &[String]) -> Vec<MergedPool> {
    let count = per_disease
        .iter()
        .map(|(_, pools)| pools.len())
        .max()
        .unwrap_or(0);

    (0..count)
        .map(|index| {
            let recorded = per_disease
                .iter()
                .filter_map(|(_, pools)| pools.get(index))
                .map(|pool| pool.house_label.trim())
                .find(|label| !label.is_empty());

            let house_label = match recorded {
                Some(label) => label.to_string(),
                None if count == 1 => unit_houses.join(", "),
                None => unit_houses.get(index).cloned().unwrap_or_default(),
            };

            let pools = per_disease
                .iter()
                .filter_map(|(disease, pools)| {
                    pools.get(index).map(|pool| (disease.clone(), pool.clone()))
                })
                .collect();

            MergedPool {
                index,
                house_label,
                pools,
            }
        })
        .collect()
}
