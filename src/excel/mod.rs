//! Workbook import/export
//!
//! - Import: xlsx/xlsm/xlsb/xls/ods → raw sheet (via calamine)
//! - Export: table → single-sheet .xlsx (via rust_xlsxwriter)

mod exporter;
mod importer;

pub use exporter::{sanitize_sheet_name, ExcelExporter, MAX_CELL_CHARS, MAX_COLUMNS, MAX_DATA_ROWS};
pub use importer::ExcelImporter;
