use crate::error::{EditError, GridError, GridResult};
use chrono::{FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

//==============================================================================
// Column types
//==============================================================================

/// Storage type of a column. `Integer` and `Float` are both numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    DateTime,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::DateTime => "datetime",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Parse a user-supplied type name (accepts a few common aliases)
    pub fn parse(name: &str) -> GridResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "int" | "integer" | "int64" => Ok(ColumnType::Integer),
            "float" | "double" | "number" | "numeric" | "float64" => Ok(ColumnType::Float),
            "datetime" | "date" | "timestamp" => Ok(ColumnType::DateTime),
            "bool" | "boolean" => Ok(ColumnType::Boolean),
            "text" | "string" | "str" => Ok(ColumnType::Text),
            other => Err(GridError::Command(format!(
                "unknown column type '{}' (expected text, integer, float, datetime or boolean)",
                other
            ))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//==============================================================================
// Timestamps and cells
//==============================================================================

/// Wall-clock date/time with an optional UTC offset.
///
/// Displays as `%Y-%m-%d %H:%M:%S`, followed by fractional seconds only when
/// they are non-zero, so sub-second values survive a text round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub wall: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl Timestamp {
    pub fn naive(wall: NaiveDateTime) -> Self {
        Self { wall, offset: None }
    }

    pub fn with_offset(wall: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            wall,
            offset: Some(offset),
        }
    }

    pub fn is_aware(&self) -> bool {
        self.offset.is_some()
    }

    /// Drop the offset, keeping the wall-clock value
    pub fn strip_offset(self) -> Self {
        Self::naive(self.wall)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wall.format("%Y-%m-%d %H:%M:%S%.f"))?;
        if let Some(offset) = self.offset {
            write!(f, "{}", offset)?;
        }
        Ok(())
    }
}

/// A single cell, used for constant fills and rendering
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(Timestamp),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render for display; null renders as an empty string
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::DateTime(ts) => ts.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Shortest representation that round-trips through `str::parse::<f64>`.
/// Whole values keep a trailing `.0` so they reload as floats, not integers.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

//==============================================================================
// Columns
//==============================================================================

/// Typed column storage; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    DateTime(Vec<Option<Timestamp>>),
    Boolean(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// A column of `len` nulls with the given storage type
    pub fn nulls(column_type: ColumnType, len: usize) -> Self {
        match column_type {
            ColumnType::Integer => ColumnData::Integer(vec![None; len]),
            ColumnType::Float => ColumnData::Float(vec![None; len]),
            ColumnType::DateTime => ColumnData::DateTime(vec![None; len]),
            ColumnType::Boolean => ColumnData::Boolean(vec![None; len]),
            ColumnType::Text => ColumnData::Text(vec![None; len]),
        }
    }

    /// A column repeating `value` for every row
    pub fn filled(value: &CellValue, len: usize) -> Self {
        match value {
            CellValue::Null => ColumnData::Float(vec![None; len]),
            CellValue::Integer(i) => ColumnData::Integer(vec![Some(*i); len]),
            CellValue::Float(f) => ColumnData::Float(vec![Some(*f); len]),
            CellValue::Boolean(b) => ColumnData::Boolean(vec![Some(*b); len]),
            CellValue::DateTime(ts) => ColumnData::DateTime(vec![Some(*ts); len]),
            CellValue::Text(s) => ColumnData::Text(vec![Some(s.clone()); len]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::DateTime(_) => ColumnType::DateTime,
            ColumnData::Boolean(_) => ColumnType::Boolean,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::DateTime(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    pub fn cell(&self, row: usize) -> CellValue {
        let cell = match self {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(CellValue::Integer),
            ColumnData::Float(v) => v.get(row).copied().flatten().map(CellValue::Float),
            ColumnData::DateTime(v) => v.get(row).copied().flatten().map(CellValue::DateTime),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(CellValue::Boolean),
            ColumnData::Text(v) => v.get(row).cloned().flatten().map(CellValue::Text),
        };
        cell.unwrap_or(CellValue::Null)
    }

    /// Numeric view of the column (integers widened to f64); `None` for other types
    pub fn as_f64(&self) -> Option<Vec<Option<f64>>> {
        match self {
            ColumnData::Integer(v) => Some(v.iter().map(|x| x.map(|i| i as f64)).collect()),
            ColumnData::Float(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// True when any value carries a UTC offset
    pub fn is_tz_aware(&self) -> bool {
        match self {
            ColumnData::DateTime(v) => v.iter().flatten().any(Timestamp::is_aware),
            _ => false,
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }
}

//==============================================================================
// Table
//==============================================================================

/// Ordered, uniquely named columns sharing one row count
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Empty table with a fixed row count (columns are added afterwards)
    pub fn with_rows(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Build a table from columns, checking name uniqueness and lengths
    pub fn from_columns(columns: Vec<Column>) -> GridResult<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut table = Self::with_rows(row_count);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Rename the column at `index`; callers check uniqueness first
    pub(crate) fn rename_at(&mut self, index: usize, name: &str) {
        if let Some(column) = self.columns.get_mut(index) {
            column.name = name.to_string();
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn null_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.null_count()).sum()
    }

    /// Append a column; rejects duplicate names and mismatched lengths
    pub fn push_column(&mut self, column: Column) -> GridResult<()> {
        if self.contains(&column.name) {
            return Err(EditError::NameCollision(column.name).into());
        }
        if column.len() != self.row_count {
            return Err(GridError::Command(format!(
                "column '{}' has {} rows, expected {} rows",
                column.name,
                column.len(),
                self.row_count
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column by name, returning it
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    /// Replace the storage of an existing column (same length required)
    pub fn replace_data(&mut self, name: &str, data: ColumnData) -> GridResult<()> {
        let row_count = self.row_count;
        let column = self
            .column_mut(name)
            .ok_or_else(|| EditError::UnknownColumn(name.to_string()))?;
        if data.len() != row_count {
            return Err(GridError::Command(format!(
                "column '{}' has {} rows, expected {} rows",
                name,
                data.len(),
                row_count
            )));
        }
        column.data = data;
        Ok(())
    }

    pub fn cell(&self, row: usize, column: usize) -> CellValue {
        self.columns
            .get(column)
            .map_or(CellValue::Null, |c| c.data.cell(row))
    }

    pub fn row(&self, row: usize) -> Vec<CellValue> {
        self.columns.iter().map(|c| c.data.cell(row)).collect()
    }

    /// Copy of the table with every datetime offset dropped (wall clock kept)
    pub fn to_naive(&self) -> Table {
        let mut table = self.clone();
        for column in &mut table.columns {
            if let ColumnData::DateTime(values) = &mut column.data {
                for value in values.iter_mut().flatten() {
                    *value = value.strip_offset();
                }
            }
        }
        table
    }
}

//==============================================================================
// Sources
//==============================================================================

/// Tabular file formats, detected by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
    Xlsx,
    Xlsm,
    Xlsb,
    Xls,
    Ods,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" => Some(FileFormat::Tsv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xlsm" => Some(FileFormat::Xlsm),
            "xlsb" => Some(FileFormat::Xlsb),
            "xls" => Some(FileFormat::Xls),
            "ods" => Some(FileFormat::Ods),
            _ => None,
        }
    }

    pub fn is_delimited(&self) -> bool {
        matches!(self, FileFormat::Csv | FileFormat::Tsv)
    }

    /// Whether GridX can write this format
    pub fn is_writable(&self) -> bool {
        matches!(self, FileFormat::Csv | FileFormat::Tsv | FileFormat::Xlsx)
    }
}

/// Sheet names of a source plus the active one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSet {
    names: Vec<String>,
    active: usize,
}

impl SheetSet {
    pub fn new(names: Vec<String>, active: usize) -> Self {
        let active = active.min(names.len().saturating_sub(1));
        Self { names, active }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self::new(vec![name.into()], 0)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn active(&self) -> Option<&str> {
        self.names.get(self.active).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
