use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The classified outcome of one disease on one unit.
///
/// Which pair applies depends on the department and disease family:
/// PCR yields Positive/Negative, Microbiology culture screens yield
/// Detected/NotDetected and quantitative Microbiology yields
/// OverLimit/WithinLimit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Verdict {
    Positive,
    Negative,
    Detected,
    NotDetected,
    OverLimit,
    WithinLimit,
}

impl Verdict {
    /// Label shown on certificates and in exports.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Positive => "Positive",
            Verdict::Negative => "Negative",
            Verdict::Detected => "Detected",
            Verdict::NotDetected => "Not Detected",
            Verdict::OverLimit => "Over Limit",
            Verdict::WithinLimit => "Within Limit",
        }
    }

    /// Verdicts that call for highlighting.
    pub fn is_abnormal(self) -> bool {
        matches!(
            self,
            Verdict::Positive | Verdict::Detected | Verdict::OverLimit
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict selection applied while classifying a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VerdictFilter {
    #[default]
    All,
    Only(Verdict),
}

impl VerdictFilter {
    pub fn admits(self, verdict: Verdict) -> bool {
        match self {
            VerdictFilter::All => true,
            VerdictFilter::Only(wanted) => wanted == verdict,
        }
    }
}
