//! End-to-end session tests over the fixtures in test-data/

use gridx::config::{InferenceOrder, Settings};
use gridx::core::editor::{Edit, Fill};
use gridx::core::{AnalysisKind, Session};
use gridx::error::{EditError, GridError};
use gridx::types::{CellValue, ColumnType, Table};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

fn open(name: &str) -> Session {
    let mut session = Session::new(Settings::default()).unwrap();
    session.open(&fixture(name), None).unwrap();
    session
}

fn types(table: &Table) -> Vec<(String, ColumnType)> {
    table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.column_type()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// LOADING AND INFERENCE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_shape_and_unique_columns() {
    let session = open("sales.csv");
    let table = session.table().unwrap();
    assert_eq!(table.row_count(), 6);
    assert_eq!(table.column_count(), 6);
    let names: HashSet<&str> = table.column_names().into_iter().collect();
    assert_eq!(names.len(), 6);
}

#[test]
fn test_load_infers_types() {
    let session = open("sales.csv");
    assert_eq!(
        types(session.table().unwrap()),
        vec![
            ("id".to_string(), ColumnType::Integer),
            ("region".to_string(), ColumnType::Text),
            ("units".to_string(), ColumnType::Integer),
            ("price".to_string(), ColumnType::Float),
            ("order_date".to_string(), ColumnType::DateTime),
            ("paid".to_string(), ColumnType::Text),
        ]
    );
}

#[test]
fn test_semicolon_file_with_decimal_commas() {
    let session = open("semicolon.csv");
    let table = session.table().unwrap();
    assert_eq!(
        table.column_names(),
        vec!["produto", "valor", "quantidade", "data"]
    );
    assert_eq!(table.cell(0, 0), CellValue::Text("Café".to_string()));
    assert_eq!(table.cell(0, 1), CellValue::Float(1.5));
    assert_eq!(table.column("data").unwrap().column_type(), ColumnType::DateTime);
    assert_eq!(table.cell(0, 3).render(), "2024-01-05 00:00:00");
}

#[test]
fn test_unparsable_values_become_null() {
    let session = open("mixed.csv");
    let table = session.table().unwrap();
    let score = table.column("score").unwrap();
    assert_eq!(score.column_type(), ColumnType::Integer);
    assert_eq!(score.data.cell(1), CellValue::Null);
    assert_eq!(table.column("note").unwrap().data.null_count(), 2);
}

#[test]
fn test_tsv_fixture() {
    let session = open("people.tsv");
    let table = session.table().unwrap();
    assert_eq!(table.column_names(), vec!["name", "age", "city"]);
    assert_eq!(table.column("age").unwrap().column_type(), ColumnType::Integer);
    assert_eq!(table.null_count(), 1);
}

#[test]
fn test_mixed_offsets_load_as_datetimes() {
    let mut session = open("dates_tz.csv");
    let table = session.table().unwrap();
    let at = &table.column("at").unwrap().data;
    assert_eq!(at.column_type(), ColumnType::DateTime);
    assert!(at.is_tz_aware());
    assert_eq!(at.cell(0).render(), "2024-03-01 09:30:00-03:00");
    assert_eq!(at.cell(2).render(), "2024-03-01 18:45:10");

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("dates.csv");
    session.save(&out).unwrap();
    let saved = fs::read_to_string(&out).unwrap();
    assert!(saved.contains("start,2024-03-01 09:30:00\n"));
    assert!(saved.contains("middle,2024-03-01 12:00:00\n"));
}

#[test]
fn test_sparse_numeric_column_stays_text() {
    // 2 of 6 rows filled: 0.33 of the rows parse, below the 0.6 threshold
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sparse.csv");
    fs::write(&path, "k,v\na,1\nb,2\nc,\nd,\ne,\nf,\n").unwrap();

    let mut session = Session::new(Settings::default()).unwrap();
    let table = session.open(&path, None).unwrap();
    let v = table.column("v").unwrap();
    assert_eq!(v.column_type(), ColumnType::Text);
    assert_eq!(v.data.cell(1), CellValue::Text("2".to_string()));
    assert_eq!(v.data.null_count(), 4);
}

#[test]
fn test_inference_order_on_ambiguous_column() {
    // "1.2.2024" parses as a day-first date but not as a number
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ambiguous.csv");
    fs::write(&path, "v\n1.2.2024\n2.5\n3.5\n4.5\n5.5\n").unwrap();

    let mut numeric_first = Session::new(Settings {
        inference_order: InferenceOrder::NumericFirst,
        ..Settings::default()
    })
    .unwrap();
    let table = numeric_first.open(&path, None).unwrap();
    assert_eq!(table.columns()[0].column_type(), ColumnType::Float);
    assert_eq!(table.cell(0, 0), CellValue::Null);
}

// ═══════════════════════════════════════════════════════════════════════════
// EDITING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_boolean_vocabulary_retype() {
    let mut session = open("sales.csv");
    session
        .apply(&Edit::retype(["paid"], ColumnType::Boolean))
        .unwrap();
    let paid = &session.table().unwrap().column("paid").unwrap().data;
    let values: Vec<CellValue> = (0..6).map(|r| paid.cell(r)).collect();
    assert_eq!(
        values,
        vec![
            CellValue::Boolean(true),
            CellValue::Boolean(false),
            CellValue::Boolean(true),
            CellValue::Boolean(false),
            CellValue::Boolean(true),
            CellValue::Boolean(false),
        ]
    );
}

#[test]
fn test_add_then_delete_restores_columns() {
    let mut session = open("sales.csv");
    let before = session.table().cloned().unwrap();
    session
        .apply(&Edit::add("discount", Fill::Constant(CellValue::Float(0.1))))
        .unwrap();
    assert_eq!(session.table().unwrap().column_count(), 7);
    session.apply(&Edit::delete(["discount"])).unwrap();
    assert_eq!(session.table().unwrap(), &before);
}

#[test]
fn test_rename_onto_existing_name_is_rejected() {
    let mut session = open("sales.csv");
    let before = session.table().cloned().unwrap();
    let err = session
        .apply(&Edit::rename([("units", "price")]))
        .unwrap_err();
    assert!(matches!(err, GridError::Edit(EditError::NameCollision(ref n)) if n == "price"));
    assert_eq!(session.table().unwrap(), &before);
}

#[test]
fn test_retype_batch_with_one_failure() {
    let mut session = open("sales.csv");
    let err = session
        .apply(&Edit::retype(["units", "region", "id"], ColumnType::Float))
        .unwrap_err();
    match err {
        GridError::Edit(EditError::Retype { failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].column, "region");
        }
        other => panic!("Expected retype failure, got {:?}", other),
    }
    let table = session.table().unwrap();
    assert_eq!(table.column("units").unwrap().column_type(), ColumnType::Float);
    assert_eq!(table.column("id").unwrap().column_type(), ColumnType::Float);
    assert_eq!(table.column("region").unwrap().column_type(), ColumnType::Text);
}

// ═══════════════════════════════════════════════════════════════════════════
// PREVIEW, ANALYSIS, LOG
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_preview_counts() {
    let mut session = Session::new(Settings {
        preview_rows: 2,
        ..Settings::default()
    })
    .unwrap();
    session.open(&fixture("sales.csv"), None).unwrap();
    let preview = session.preview().unwrap();
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.row_count, 6);
    assert_eq!(preview.column_count, 6);
    assert_eq!(preview.null_count, 1);
}

#[test]
fn test_analysis_reports() {
    let mut session = open("sales.csv");
    let summary = session.analyze(AnalysisKind::Summary, &[]).unwrap();
    assert!(summary.contains("6 rows × 6 columns"));

    let profile = session
        .analyze(AnalysisKind::Profile, &["units".to_string(), "ghost".to_string()])
        .unwrap();
    assert!(profile.contains("units"));
    assert!(profile.contains("ghost"));
}

#[test]
fn test_time_series_analysis() {
    let mut session = open("sales.csv");
    session.apply(&Edit::delete(["id"])).unwrap();
    let text = session.analyze(AnalysisKind::TimeSeries, &[]).unwrap();
    assert!(text.starts_with("Time series: units by order_date (5 points)"));
    assert!(text.contains("   2024-01-05 00:00:00  10\n"));
    assert!(!text.contains("2024-01-08"));

    let mut people = open("people.tsv");
    let err = people.analyze(AnalysisKind::TimeSeries, &[]).unwrap_err();
    assert!(matches!(err, GridError::Analysis(_)));
}

#[test]
fn test_correlation_needs_two_numeric_columns() {
    let mut session = open("people.tsv");
    let err = session.analyze(AnalysisKind::Correlation, &[]).unwrap_err();
    assert!(matches!(err, GridError::Analysis(_)));
}

#[test]
fn test_activity_log_records_failures() {
    let mut session = open("sales.csv");
    let _ = session.apply(&Edit::delete(["nope"]));
    let lines: Vec<String> = session.log().entries().iter().map(|e| e.to_string()).collect();
    assert!(lines.iter().any(|l| l.contains("opened")));
    assert!(lines.iter().any(|l| l.contains("error:") && l.contains("nope")));
}
