use std::io::{Read, Write};
use std::num::NonZeroUsize;
use std::path::Path;

use eyre::WrapErr;
use labcert_core::models::certificate::{decode_records, UnitRecord};
use labcert_export::columns::VisibleColumns;
use labcert_export::projection::{project, ExportTable};
use labcert_view::filter::ViewFilters;
use labcert_view::view::{build_rows, build_view, disease_columns, select, Layout, View};

/// Read a JSON array of unit records from a file, or from stdin for `-`.
pub fn read_records(path: &Path) -> eyre::Result<Vec<UnitRecord>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("failed to read records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read records from {}", path.display()))?
    };

    let records = decode_records(&contents)
        .wrap_err_with(|| format!("failed to decode records from {}", path.display()))?;
    tracing::debug!(count = records.len(), "decoded unit records");
    Ok(records)
}

/// Build the export table. With a chunk size, rows are built slice by slice
/// against disease columns fixed up front; the result is the same table.
pub fn export_table(
    records: &[UnitRecord],
    filters: &ViewFilters,
    layout: Layout,
    visible: &VisibleColumns,
    chunk_size: Option<NonZeroUsize>,
) -> ExportTable {
    let Some(chunk_size) = chunk_size else {
        return project(&build_view(records, filters, layout), visible);
    };

    let selected = select(records, filters);
    let diseases = disease_columns(selected.iter().copied(), filters);
    let mut view = View {
        diseases,
        rows: Vec::new(),
    };
    let mut table = project(&view, visible);

    for (index, chunk) in selected.chunks(chunk_size.get()).enumerate() {
        view.rows = build_rows(chunk, &view.diseases, filters, layout);
        let part = project(&view, visible);
        tracing::debug!(chunk = index, rows = part.rows.len(), "exported chunk");
        table.rows.extend(part.rows);
    }
    table
}

/// Write a table as tab-separated text, one line per row. Tabs and line
/// breaks inside values become spaces.
pub fn write_tsv(table: &ExportTable, out: &mut impl Write) -> std::io::Result<()> {
    let line = |values: &[String]| -> String {
        values
            .iter()
            .map(|v| v.replace(['\t', '\n', '\r'], " "))
            .collect::<Vec<_>>()
            .join("\t")
    };

    writeln!(out, "{}", line(&table.headers))?;
    for row in &table.rows {
        writeln!(out, "{}", line(row))?;
    }
    Ok(())
}
