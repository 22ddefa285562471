//! Raw result payloads as entered by technicians.
//!
//! Two historical shapes exist for a disease's results: a flat object keyed
//! by sample type (or location index), and a list of pools. The shape is
//! decided once, here, so that downstream code only ever sees the tagged
//! [`RawResultPayload`].
//!
//! Result entries keep the order they were entered in: "first match" and
//! tie-breaks downstream depend on it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use ts_rs::TS;

/// Key spellings under which the positive control lane has been stored over
/// time, in lookup priority order.
pub const POSITIVE_CONTROL_KEYS: [&str; 3] = ["pos_control", "POS. CONTROL", "Pos. Control"];

/// Keys of the legacy shape that never hold a subject result.
pub const RESERVED_KEYS: [&str; 6] = [
    "houses",
    "indices",
    "pos_control",
    "neg_control",
    "POS. CONTROL",
    "Pos. Control",
];

pub const DEFAULT_NEGATIVE_CONTROL: &str = "confirmed";

/// Key → raw value, in entry order.
pub type ResultValues = IndexMap<String, String>;

/// A group of sample-type results sharing one physical house label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pool {
    #[serde(default, alias = "houses")]
    pub house_label: String,
    #[serde(default)]
    pub values: ResultValues,
    #[serde(default, alias = "pos_control")]
    pub positive_control: String,
    #[serde(default = "default_negative_control", alias = "neg_control")]
    pub negative_control: String,
}

fn default_negative_control() -> String {
    DEFAULT_NEGATIVE_CONTROL.to_string()
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            house_label: String::new(),
            values: ResultValues::new(),
            positive_control: String::new(),
            negative_control: default_negative_control(),
        }
    }
}

impl Pool {
    /// Decode one element of the pooled shape. Scalar values are coerced to
    /// text; anything that is not an object is rejected.
    pub fn decode(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let house_label = text_field(obj, &["house_label", "houses"]).unwrap_or_default();
        let positive_control =
            text_field(obj, &["positive_control", "pos_control"]).unwrap_or_default();
        let negative_control = text_field(obj, &["negative_control", "neg_control"])
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_negative_control);

        let values = obj
            .get("values")
            .and_then(Value::as_object)
            .map(scalar_entries)
            .unwrap_or_default();

        Some(Self {
            house_label,
            values,
            positive_control,
            negative_control,
        })
    }
}

/// The flat, pre-pool result shape: key → raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPayload {
    pub entries: ResultValues,
}

impl LegacyPayload {
    /// The positive control value under the first historical key present.
    pub fn positive_control(&self) -> Option<&str> {
        POSITIVE_CONTROL_KEYS
            .iter()
            .find_map(|key| self.entries.get(*key))
            .map(String::as_str)
    }

    /// Entries that carry subject results, i.e. everything except reserved keys.
    pub fn result_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Result data for one disease on one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawResultPayload {
    Legacy(LegacyPayload),
    Pooled(Vec<Pool>),
}

impl RawResultPayload {
    /// Decode an upstream JSON value into one of the two known shapes.
    ///
    /// Returns `None` for null, scalars and strings; callers treat that the
    /// same as "no results entered".
    pub fn decode(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let pools: Vec<Pool> = items.iter().filter_map(Pool::decode).collect();
                if pools.len() != items.len() {
                    debug!(
                        total = items.len(),
                        kept = pools.len(),
                        "dropped malformed pool entries"
                    );
                }
                Some(Self::Pooled(pools))
            }
            Value::Object(map) => Some(Self::Legacy(LegacyPayload {
                entries: scalar_entries(map),
            })),
            other => {
                debug!(kind = value_kind(other), "unrecognized result payload shape");
                None
            }
        }
    }
}

impl From<Value> for RawResultPayload {
    fn from(value: Value) -> Self {
        Self::decode(&value).unwrap_or(Self::Pooled(Vec::new()))
    }
}

impl From<RawResultPayload> for Value {
    fn from(payload: RawResultPayload) -> Self {
        match payload {
            RawResultPayload::Legacy(legacy) => Value::Object(
                legacy
                    .entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
            RawResultPayload::Pooled(pools) => Value::Array(
                pools
                    .into_iter()
                    .map(|pool| serde_json::to_value(pool).unwrap_or(Value::Null))
                    .collect(),
            ),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_entries(map: &Map<String, Value>) -> ResultValues {
    map.iter()
        .filter_map(|(k, v)| scalar_text(v).map(|text| (k.clone(), text)))
        .collect()
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| obj.get(*key).and_then(scalar_text))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
