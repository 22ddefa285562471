//! View → export table.

use labcert_view::view::View;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::columns::{layout, VisibleColumns};
use crate::error::ExportError;

/// A flat, text-only table ready for any file writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rows as header → value objects, the shape spreadsheet exporters take.
    /// Keys follow the column order.
    pub fn to_records(&self) -> Result<serde_json::Value, ExportError> {
        let records: Vec<serde_json::Map<String, serde_json::Value>> = self
            .rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(serde_json::Value::String))
                    .collect()
            })
            .collect();
        Ok(serde_json::to_value(records)?)
    }
}

/// Flatten a view. One table row per view row, in view order.
pub fn project(view: &View, visible: &VisibleColumns) -> ExportTable {
    let columns = layout(view.diseases.len(), visible);

    let headers = columns
        .iter()
        .map(|column| column.header(&view.diseases))
        .collect();
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| columns.iter().map(|column| column.value(row)).collect())
        .collect();

    info!(columns = columns.len(), rows = rows.len(), "projected export table");
    ExportTable { headers, rows }
}
