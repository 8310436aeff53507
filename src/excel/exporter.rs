//! Excel exporter implementation

use crate::error::SaveError;
use crate::types::{ColumnData, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Data rows available below the header row
pub const MAX_DATA_ROWS: usize = 1_048_575;
/// Columns per worksheet
pub const MAX_COLUMNS: usize = 16_384;
/// Characters per cell
pub const MAX_CELL_CHARS: usize = 32_767;
/// Characters per worksheet name
const MAX_SHEET_NAME: usize = 31;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DATETIME_COLUMN_WIDTH: f64 = 20.0;

/// Writes one table as a single-sheet .xlsx workbook
pub struct ExcelExporter<'a> {
    table: &'a Table,
    sheet_name: String,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new exporter; the sheet name is sanitized for Excel
    pub fn new(table: &'a Table, sheet_name: &str) -> Self {
        Self {
            table,
            sheet_name: sanitize_sheet_name(sheet_name),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Export the table to an .xlsx file
    pub fn export(&self, output_path: &Path) -> Result<(), SaveError> {
        self.check_limits()?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| self.io_error(output_path, format!("Failed to set worksheet name: {}", e)))?;

        self.write_sheet(worksheet)
            .map_err(|e| self.io_error(output_path, e))?;

        workbook
            .save(output_path)
            .map_err(|e| self.io_error(output_path, format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    /// Reject content that an Excel worksheet cannot hold
    fn check_limits(&self) -> Result<(), SaveError> {
        if self.table.row_count() > MAX_DATA_ROWS {
            return Err(SaveError::UnsupportedContent(format!(
                "{} rows exceed the worksheet limit of {}",
                self.table.row_count(),
                MAX_DATA_ROWS
            )));
        }
        if self.table.column_count() > MAX_COLUMNS {
            return Err(SaveError::UnsupportedContent(format!(
                "{} columns exceed the worksheet limit of {}",
                self.table.column_count(),
                MAX_COLUMNS
            )));
        }

        for column in self.table.columns() {
            if column.name.chars().count() > MAX_CELL_CHARS {
                return Err(SaveError::UnsupportedContent(format!(
                    "header of column starting '{}' is too long",
                    column.name.chars().take(20).collect::<String>()
                )));
            }
            match &column.data {
                ColumnData::Float(values) => {
                    if let Some(row) = values.iter().position(|v| v.is_some_and(|f| !f.is_finite())) {
                        return Err(SaveError::UnsupportedContent(format!(
                            "column '{}' row {}: non-finite number",
                            column.name,
                            row + 1
                        )));
                    }
                }
                ColumnData::Text(values) => {
                    if let Some(row) = values
                        .iter()
                        .position(|v| v.as_ref().is_some_and(|s| s.chars().count() > MAX_CELL_CHARS))
                    {
                        return Err(SaveError::UnsupportedContent(format!(
                            "column '{}' row {}: text longer than {} characters",
                            column.name,
                            row + 1,
                            MAX_CELL_CHARS
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn write_sheet(&self, worksheet: &mut Worksheet) -> Result<(), String> {
        let header_format = Format::new().set_bold();
        let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

        // Write header row (row 0)
        for (col_idx, column) in self.table.columns().iter().enumerate() {
            let col = col_idx as u16;
            worksheet
                .write_string_with_format(0, col, &column.name, &header_format)
                .map_err(|e| format!("Failed to write header: {}", e))?;

            if let ColumnData::DateTime(_) = column.data {
                worksheet
                    .set_column_width(col, DATETIME_COLUMN_WIDTH)
                    .map_err(|e| format!("Failed to set column width: {}", e))?;
            }

            self.write_column(worksheet, col, &column.data, &datetime_format)?;
        }
        Ok(())
    }

    /// Write data cells (starting at row 1); nulls stay blank
    fn write_column(
        &self,
        worksheet: &mut Worksheet,
        col: u16,
        data: &ColumnData,
        datetime_format: &Format,
    ) -> Result<(), String> {
        let row_of = |idx: usize| (idx + 1) as u32;
        match data {
            ColumnData::Integer(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if let Some(n) = value {
                        worksheet
                            .write_number(row_of(idx), col, *n as f64)
                            .map_err(|e| format!("Failed to write number: {}", e))?;
                    }
                }
            }
            ColumnData::Float(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if let Some(n) = value {
                        worksheet
                            .write_number(row_of(idx), col, *n)
                            .map_err(|e| format!("Failed to write number: {}", e))?;
                    }
                }
            }
            ColumnData::Boolean(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if let Some(b) = value {
                        worksheet
                            .write_boolean(row_of(idx), col, *b)
                            .map_err(|e| format!("Failed to write boolean: {}", e))?;
                    }
                }
            }
            ColumnData::DateTime(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if let Some(ts) = value {
                        worksheet
                            .write_datetime_with_format(row_of(idx), col, &ts.wall, datetime_format)
                            .map_err(|e| format!("Failed to write datetime: {}", e))?;
                    }
                }
            }
            ColumnData::Text(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if let Some(s) = value {
                        worksheet
                            .write_string(row_of(idx), col, s)
                            .map_err(|e| format!("Failed to write string: {}", e))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn io_error(&self, path: &Path, message: String) -> SaveError {
        SaveError::Io {
            path: path.to_path_buf(),
            message,
        }
    }
}

/// Make a worksheet name Excel accepts: no `[]:*?/\`, no edge quotes, at most 31 chars
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME).collect();

    if truncated.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        truncated
    }
}
