//! Saving a [`Table`] to disk; the format follows the destination extension

use crate::config::Settings;
use crate::delimited;
use crate::error::{GridResult, SaveError};
use crate::excel::ExcelExporter;
use crate::types::{FileFormat, Table};
use std::path::Path;
use tracing::info;

/// Write `table` to `path` as CSV, TSV or xlsx.
///
/// Datetime offsets are dropped (wall clock kept). `sheet_name` names the
/// worksheet for xlsx output and defaults to the file stem.
pub fn save(table: &Table, path: &Path, sheet_name: Option<&str>, settings: &Settings) -> GridResult<()> {
    let format = FileFormat::from_path(path)
        .filter(FileFormat::is_writable)
        .ok_or_else(|| SaveError::UnsupportedFormat(path.display().to_string()))?;

    let table = table.to_naive();
    match format {
        FileFormat::Csv => delimited::write(&table, path, b',', settings.csv_bom)?,
        FileFormat::Tsv => delimited::write(&table, path, b'\t', settings.csv_bom)?,
        _ => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            ExcelExporter::new(&table, sheet_name.unwrap_or(&stem)).export(path)?;
        }
    }

    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "saved table"
    );
    Ok(())
}
