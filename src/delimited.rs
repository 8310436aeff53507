//! CSV/TSV import and export

use crate::error::{LoadError, SaveError};
use crate::loader::RawSheet;
use crate::types::{ColumnData, Table, Timestamp};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell spellings read as missing values
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Read a delimited file; `delimiter` of `None` sniffs it from the content
pub fn read(path: &Path, delimiter: Option<u8>) -> Result<RawSheet, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    parse(&content, delimiter)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (comma, semicolon, tab, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b',', b';', b'\t', b'|'];
    let sample_lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let Some(&target) = counts.first() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        // Consistent lines weighted by field count; ties keep the earlier candidate
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn parse(content: &str, delimiter: u8) -> Result<RawSheet, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| LoadError::Parse(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return Err(LoadError::Parse("file is empty; a header row is required".into())),
    };

    let width = headers.len();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut row_count = 0;

    for result in records {
        let record = result.map_err(|e| LoadError::Parse(e.to_string()))?;
        // blank line
        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line());
            return Err(LoadError::Parse(format!(
                "line {}: expected {} fields, found {}",
                line,
                width,
                record.len()
            )));
        }
        for (col, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(col)
                .filter(|v| !NULL_TOKENS.contains(&v.trim()))
                .map(str::to_string);
            column.push(value);
        }
        row_count += 1;
    }

    Ok(RawSheet {
        headers,
        columns: cells.into_iter().map(ColumnData::Text).collect(),
        row_count,
    })
}

/// Write a table as delimited text, optionally prefixed with a UTF-8 BOM
pub fn write(table: &Table, path: &Path, delimiter: u8, bom: bool) -> Result<(), SaveError> {
    let io_err = |e: &dyn std::fmt::Display| SaveError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut file = BufWriter::new(File::create(path).map_err(|e| io_err(&e))?);
    if bom {
        file.write_all(UTF8_BOM).map_err(|e| io_err(&e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(file);

    if table.column_count() > 0 {
        writer
            .write_record(table.column_names())
            .map_err(|e| io_err(&e))?;

        let date_only: Vec<bool> = table
            .columns()
            .iter()
            .map(|c| is_date_only(&c.data))
            .collect();

        for row in 0..table.row_count() {
            let record: Vec<String> = table
                .columns()
                .iter()
                .zip(&date_only)
                .map(|(column, &date_only)| match (&column.data, date_only) {
                    (ColumnData::DateTime(values), true) => values
                        .get(row)
                        .copied()
                        .flatten()
                        .map(|ts| ts.wall.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    (data, _) => data.cell(row).render(),
                })
                .collect();
            writer.write_record(&record).map_err(|e| io_err(&e))?;
        }
    }

    writer.flush().map_err(|e| io_err(&e))?;
    Ok(())
}

/// A datetime column whose values all fall on midnight
fn is_date_only(data: &ColumnData) -> bool {
    match data {
        ColumnData::DateTime(values) => values
            .iter()
            .flatten()
            .all(|ts: &Timestamp| ts.wall.time() == chrono::NaiveTime::MIN),
        _ => false,
    }
}
