use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::unit::SerologySummary;
use super::verdict::Verdict;

/// Text rendered for a missing cell, whether the assay is absent or the
/// assay is present with nothing to show.
pub const ABSENT: &str = "-";

/// Text shown for a PCR cell whose only signal is a negative entry.
pub const NEGATIVE_DISPLAY: &str = "NEG.";

/// What a classified cell shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum CellContent {
    /// A closed-set verdict (Microbiology).
    Verdict { verdict: Verdict },
    /// A representative raw value, optionally labelled with the sample type
    /// it came from (PCR).
    Representative {
        value: String,
        sample_type: Option<String>,
        verdict: Option<Verdict>,
    },
    /// Recorded statistics, passed through untouched (Serology).
    Serology {
        summary: SerologySummary,
        certificate_file: Option<String>,
    },
    /// The disease is assayed but there is nothing to display.
    Empty,
}

/// The unit of rendering for one disease on one unit (or pool).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayCell {
    pub content: CellContent,
    pub is_abnormal: bool,
}

impl DisplayCell {
    pub fn empty() -> Self {
        Self {
            content: CellContent::Empty,
            is_abnormal: false,
        }
    }

    pub fn verdict(verdict: Verdict) -> Self {
        Self {
            content: CellContent::Verdict { verdict },
            is_abnormal: verdict.is_abnormal(),
        }
    }

    /// The verdict this cell stands for, if it stands for one.
    pub fn classified_verdict(&self) -> Option<Verdict> {
        match &self.content {
            CellContent::Verdict { verdict } => Some(*verdict),
            CellContent::Representative { verdict, .. } => *verdict,
            CellContent::Serology { .. } | CellContent::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// Display text. This is the only formatting path for cells; the
    /// on-screen table and the export both go through it.
    pub fn text(&self) -> String {
        match &self.content {
            CellContent::Verdict { verdict } => verdict.label().to_string(),
            CellContent::Representative {
                value,
                sample_type: Some(sample_type),
                ..
            } => format!("{sample_type}: {value}"),
            CellContent::Representative { value, .. } => value.clone(),
            CellContent::Serology { summary, .. } => serology_text(summary),
            CellContent::Empty => ABSENT.to_string(),
        }
    }
}

/// Render an optional cell. `None` means the unit does not list the disease.
pub fn render_cell(cell: Option<&DisplayCell>) -> String {
    cell.map(DisplayCell::text)
        .unwrap_or_else(|| ABSENT.to_string())
}

/// Format a parsed number the way it is shown on certificates: integral
/// values without a fractional part.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

fn serology_text(summary: &SerologySummary) -> String {
    if summary.is_empty() {
        return ABSENT.to_string();
    }
    let field = |v: Option<f64>| v.map(format_number).unwrap_or_else(|| ABSENT.to_string());
    format!(
        "Mean: {}, CV%: {}, Min: {}, Max: {}",
        field(summary.mean),
        field(summary.cv),
        field(summary.min),
        field(summary.max),
    )
}
