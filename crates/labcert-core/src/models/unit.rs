use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::department::Department;

/// One physical test subject within a sample.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Unit {
    pub id: i64,
    pub sample_id: i64,
    pub unit_code: String,
    pub department: Department,
    /// Ordered house labels. Upstream stores these under `house`.
    #[serde(default, alias = "house")]
    pub houses: Vec<String>,
    /// Free text, e.g. "21 days".
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Tissue / organ / specimen types. Upstream stores these under `sample_type`.
    #[serde(default, alias = "sample_type")]
    pub sample_types: Vec<String>,
    #[serde(default)]
    pub samples_number: Option<u32>,
    /// Microbiology location names, addressed by 1-based result index.
    #[serde(default, alias = "index_list")]
    pub location_names: Vec<String>,
    #[serde(default, alias = "diseases_list")]
    pub assays: Vec<DiseaseAssay>,
    #[serde(default)]
    pub coa_status: Option<String>,
}

impl Unit {
    /// The assay for `disease`, matched ignoring case and surrounding
    /// whitespace.
    pub fn assay(&self, disease: &str) -> Option<&DiseaseAssay> {
        let disease = disease.trim();
        self.assays
            .iter()
            .find(|a| a.disease.trim().eq_ignore_ascii_case(disease))
    }

    pub fn has_assay(&self, disease: &str) -> bool {
        self.assay(disease).is_some()
    }

    /// Whether any of the unit's sample types contains `needle`, ignoring case.
    pub fn has_sample_type_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.sample_types
            .iter()
            .any(|st| st.to_lowercase().contains(&needle))
    }
}

/// A disease tested on a unit, with the kit used.
///
/// Microbiology units list their diseases as bare names, the other
/// departments as objects; both shapes deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DiseaseAssay {
    pub disease: String,
    #[serde(default)]
    pub kit_type: Option<String>,
    /// Number of tests this assay accounts for in statistics. Missing means 1.
    /// Microbiology counts the unit's `samples_number` instead.
    pub test_count: Option<u32>,
    /// Serology only.
    pub summary: Option<SerologySummary>,
    /// Serology only: reference to the uploaded certificate file.
    pub certificate_file: Option<String>,
}

impl DiseaseAssay {
    pub fn named(disease: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            kit_type: None,
            test_count: None,
            summary: None,
            certificate_file: None,
        }
    }

    pub fn with_kit(mut self, kit_type: impl Into<String>) -> Self {
        self.kit_type = Some(kit_type.into());
        self
    }

    pub fn tests(&self) -> u32 {
        self.test_count.unwrap_or(1)
    }
}

impl<'de> Deserialize<'de> for DiseaseAssay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Full {
                disease: String,
                #[serde(default)]
                kit_type: Option<String>,
                #[serde(default)]
                test_count: Option<u32>,
                #[serde(default)]
                summary: Option<SerologySummary>,
                #[serde(default)]
                certificate_file: Option<String>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Name(disease) => DiseaseAssay::named(disease),
            Repr::Full {
                disease,
                kit_type,
                test_count,
                summary,
                certificate_file,
            } => DiseaseAssay {
                disease,
                kit_type: kit_type.filter(|k| !k.is_empty()),
                test_count,
                summary,
                certificate_file,
            },
        })
    }
}

/// Recorded serology statistics for one disease. Every field is optional
/// because certificates frequently omit some of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SerologySummary {
    pub mean: Option<f64>,
    pub cv: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SerologySummary {
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of statistics present.
    pub fn field_count(&self) -> usize {
        [self.mean, self.cv, self.min, self.max]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}
