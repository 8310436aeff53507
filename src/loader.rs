//! Loading tabular files into a [`Table`]

use crate::core::inference::Inferencer;
use crate::delimited;
use crate::error::{GridResult, LoadError};
use crate::excel::ExcelImporter;
use crate::types::{Column, ColumnData, FileFormat, SheetSet, Table};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Header row plus untyped-or-natively-typed columns, before inference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub columns: Vec<ColumnData>,
    pub row_count: usize,
}

/// A freshly loaded file: its format, its sheets and the typed table
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub format: FileFormat,
    pub sheets: SheetSet,
    pub table: Table,
}

/// Load `path` (optionally a specific sheet) and infer column types
pub fn load(path: &Path, sheet: Option<&str>, inferencer: &Inferencer) -> GridResult<LoadedSource> {
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        }
        .into());
    }

    let format = FileFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;

    let (sheets, raw) = if format.is_delimited() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());
        if let Some(requested) = sheet {
            if requested != stem {
                return Err(LoadError::SingleSheet(path.display().to_string()).into());
            }
        }
        let delimiter = match format {
            FileFormat::Tsv => Some(b'\t'),
            _ => None,
        };
        (SheetSet::single(stem), delimited::read(path, delimiter)?)
    } else {
        ExcelImporter::new(path).import(sheet)?
    };

    let table = build_table(raw)?;
    let table = inferencer.infer_table(table)?;
    info!(
        path = %path.display(),
        sheet = sheets.active().unwrap_or_default(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded table"
    );

    Ok(LoadedSource {
        format,
        sheets,
        table,
    })
}

fn build_table(raw: RawSheet) -> GridResult<Table> {
    let headers = normalize_headers(&raw.headers);
    let mut table = Table::with_rows(raw.row_count);
    for (name, data) in headers.into_iter().zip(raw.columns) {
        table.push_column(Column::new(name, data))?;
    }
    Ok(table)
}

/// Fill blank headers with `Unnamed: N` and suffix repeats with `.1`, `.2`, ...
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header.trim().to_string()
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::GridError;
    use crate::types::ColumnType;
    use std::fs;
    use tempfile::tempdir;

    fn inferencer() -> Inferencer {
        Inferencer::new(&Settings::default()).unwrap()
    }

    #[test]
    fn test_normalize_headers() {
        let headers: Vec<String> = ["a", "", "a", "a", " b "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            normalize_headers(&headers),
            vec!["a", "Unnamed: 1", "a.1", "a.2", "b"]
        );
    }

    #[test]
    fn test_load_csv_infers_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vendas.csv");
        fs::write(&path, "id;valor;data\n1;1,5;2024-01-05\n2;2,25;2024-02-10\n").unwrap();

        let loaded = load(&path, None, &inferencer()).unwrap();
        assert_eq!(loaded.format, FileFormat::Csv);
        assert_eq!(loaded.sheets.names(), &["vendas".to_string()]);
        let types: Vec<ColumnType> = loaded.table.columns().iter().map(|c| c.column_type()).collect();
        assert_eq!(
            types,
            vec![ColumnType::Integer, ColumnType::Float, ColumnType::DateTime]
        );
    }

    #[test]
    fn test_load_header_only_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "a,b\n").unwrap();
        let loaded = load(&path, None, &inferencer()).unwrap();
        assert_eq!(loaded.table.row_count(), 0);
        assert_eq!(loaded.table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("nope/missing.csv"), None, &inferencer());
        assert!(matches!(result, Err(GridError::Load(LoadError::Io { .. }))));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        let result = load(&path, None, &inferencer());
        assert!(matches!(
            result,
            Err(GridError::Load(LoadError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_csv_has_single_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a\n1\n").unwrap();
        assert!(load(&path, Some("data"), &inferencer()).is_ok());
        let result = load(&path, Some("other"), &inferencer());
        assert!(matches!(
            result,
            Err(GridError::Load(LoadError::SingleSheet(_)))
        ));
    }
}
