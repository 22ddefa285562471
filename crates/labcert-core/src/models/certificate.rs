use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::payload::RawResultPayload;
use super::sample::Sample;
use super::unit::Unit;
use crate::error::CoreError;

/// The certificate of analysis recorded for one unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Certificate {
    /// Disease name → raw results. Upstream field name is `test_results`.
    #[serde(default, alias = "test_results")]
    pub results: BTreeMap<String, RawResultPayload>,
    /// Disease name → location indices hidden from the certificate.
    #[serde(default)]
    pub hidden_indexes: BTreeMap<String, Vec<String>>,
    /// Disease name → generated report number.
    #[serde(default, alias = "test_report_numbers")]
    pub report_numbers: BTreeMap<String, String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Certificate {
    pub fn payload(&self, disease: &str) -> Option<&RawResultPayload> {
        self.results.get(disease)
    }

    pub fn hidden(&self, disease: &str) -> &[String] {
        self.hidden_indexes
            .get(disease)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One unit together with its parent sample and certificate: the input
/// record of the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecord {
    pub sample: Sample,
    pub unit: Unit,
    #[serde(default)]
    pub certificate: Option<Certificate>,
}

impl UnitRecord {
    pub fn payload(&self, disease: &str) -> Option<&RawResultPayload> {
        self.certificate.as_ref().and_then(|c| c.payload(disease))
    }
}

/// Decode a JSON array of unit records.
pub fn decode_records(json: &str) -> Result<Vec<UnitRecord>, CoreError> {
    Ok(serde_json::from_str(json)?)
}
