//! Workbook importer implementation - xlsx/xlsm/xlsb/xls/ods → table

use crate::error::LoadError;
use crate::loader::RawSheet;
use crate::types::{ColumnData, SheetSet, Timestamp};
use crate::core::inference::parse_datetime;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workbook importer reading one sheet at a time
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new workbook importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the named sheet (or the first one) together with the sheet list
    pub fn import(&self, sheet: Option<&str>) -> Result<(SheetSet, RawSheet), LoadError> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| LoadError::Parse(format!("Failed to open workbook: {}", e)))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(LoadError::Parse("workbook contains no sheets".to_string()));
        }

        let active = match sheet {
            None => 0,
            Some(name) => sheet_names.iter().position(|n| n == name).ok_or_else(|| {
                LoadError::UnknownSheet {
                    name: name.to_string(),
                    available: sheet_names.join(", "),
                }
            })?,
        };
        let sheet_name = &sheet_names[active];

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| LoadError::Parse(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;
        debug!(sheet = %sheet_name, size = ?range.get_size(), "read worksheet");

        let raw = self.process_sheet(&range);
        Ok((SheetSet::new(sheet_names, active), raw))
    }

    /// Split a worksheet range into a header row and typed columns
    fn process_sheet(&self, range: &Range<Data>) -> RawSheet {
        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            return RawSheet::default();
        }

        // Read header row (row 0)
        let headers: Vec<String> = (0..width)
            .map(|col| {
                range
                    .get((0, col))
                    .and_then(cell_text)
                    .unwrap_or_default()
            })
            .collect();

        let columns = (0..width)
            .map(|col| {
                let cells: Vec<Data> = (1..height)
                    .map(|row| range.get((row, col)).cloned().unwrap_or(Data::Empty))
                    .collect();
                self.convert_column(&cells)
            })
            .collect();

        RawSheet {
            headers,
            columns,
            row_count: height - 1,
        }
    }

    /// Convert a column of cells to typed storage.
    ///
    /// Uniform numeric, boolean or date cells keep their type; anything mixed
    /// becomes text and is left to the type inferencer.
    fn convert_column(&self, cells: &[Data]) -> ColumnData {
        let present: Vec<&Data> = cells.iter().filter(|c| !is_blank(c)).collect();
        if present.is_empty() {
            return ColumnData::Float(vec![None; cells.len()]);
        }

        if present.iter().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
            let numbers: Vec<Option<f64>> = cells.iter().map(cell_number).collect();
            let integral = numbers
                .iter()
                .flatten()
                .all(|n| n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15);
            return if integral {
                ColumnData::Integer(numbers.iter().map(|n| n.map(|v| v as i64)).collect())
            } else {
                ColumnData::Float(numbers)
            };
        }

        if present.iter().all(|c| matches!(c, Data::Bool(_))) {
            return ColumnData::Boolean(
                cells
                    .iter()
                    .map(|c| match c {
                        Data::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect(),
            );
        }

        let datetimes: Vec<Option<Timestamp>> = cells.iter().map(cell_datetime).collect();
        if datetimes.iter().flatten().count() == present.len() {
            return ColumnData::DateTime(datetimes);
        }

        ColumnData::Text(cells.iter().map(cell_text).collect())
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        _ => None,
    }
}

fn cell_datetime(cell: &Data) -> Option<Timestamp> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(Timestamp::naive),
        Data::DateTimeIso(s) => parse_datetime(s),
        _ => None,
    }
}

/// Render a cell as text the way Excel shows it (`1`, not `1.0`); blank cells are `None`
fn cell_text(cell: &Data) -> Option<String> {
    if is_blank(cell) {
        return None;
    }
    let text = match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Timestamp::naive(d).to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        Data::Empty => return None,
    };
    Some(text)
}
