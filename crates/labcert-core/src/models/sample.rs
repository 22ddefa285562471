use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A submission received by the lab. Groups one or more units and carries
/// the company / farm / flock / cycle context shared by all of them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sample {
    pub id: i64,
    pub sample_code: String,
    pub year: i32,
    pub date_received: jiff::civil::Date,
    pub company: String,
    pub farm: String,
    #[serde(default)]
    pub cycle: Option<String>,
    #[serde(default)]
    pub flock: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "pending".to_string()
}
