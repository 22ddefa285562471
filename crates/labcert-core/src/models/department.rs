use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The lab department a unit was registered under. Each department has its
/// own result shape and interpretation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Department {
    #[serde(rename = "PCR")]
    Pcr,
    #[serde(rename = "SER", alias = "Serology")]
    Serology,
    #[serde(rename = "MIC", alias = "Microbiology")]
    Microbiology,
}

impl Department {
    /// Short department code as stored upstream (`PCR`, `SER`, `MIC`).
    pub fn code(self) -> &'static str {
        match self {
            Department::Pcr => "PCR",
            Department::Serology => "SER",
            Department::Microbiology => "MIC",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Department::Pcr => "PCR",
            Department::Serology => "Serology",
            Department::Microbiology => "Microbiology",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Department {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PCR" => Ok(Department::Pcr),
            "SER" | "SEROLOGY" => Ok(Department::Serology),
            "MIC" | "MICRO" | "MICROBIOLOGY" => Ok(Department::Microbiology),
            _ => Err(CoreError::UnknownDepartment(s.to_string())),
        }
    }
}
