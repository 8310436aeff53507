//! Exploratory analyses over a loaded table
//!
//! Text-only counterparts of the classic dataframe checks: dataset info,
//! descriptive statistics, per-column profiles, missing values, duplicate
//! rows, IQR outliers, Pearson correlation and a sorted time series.

use crate::error::AnalysisError;
use crate::types::{CellValue, ColumnData, ColumnType, Table, Timestamp};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

/// Rows sampled into duplicate/outlier reports
const SAMPLE_LIMIT: usize = 5;

/// Top values listed in a non-numeric column profile
const TOP_VALUES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Summary,
    Profile,
    Missing,
    Duplicates,
    Outliers,
    Correlation,
    TimeSeries,
}

impl std::str::FromStr for AnalysisKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(AnalysisKind::Summary),
            "profile" => Ok(AnalysisKind::Profile),
            "missing" => Ok(AnalysisKind::Missing),
            "duplicates" => Ok(AnalysisKind::Duplicates),
            "outliers" => Ok(AnalysisKind::Outliers),
            "correlation" | "corr" => Ok(AnalysisKind::Correlation),
            "timeseries" | "time-series" | "series" => Ok(AnalysisKind::TimeSeries),
            other => Err(AnalysisError::UnknownAnalysis(other.to_string())),
        }
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let rounded = (n * 1e6).round() / 1e6;
    let text = format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string();
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

//==============================================================================
// Dataset info and descriptive statistics
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: usize,
    pub null_count: usize,
    pub types: Vec<(String, ColumnType)>,
}

pub fn dataset_info(table: &Table) -> DatasetInfo {
    DatasetInfo {
        rows: table.row_count(),
        columns: table.column_count(),
        null_count: table.null_count(),
        types: table
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.column_type()))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    fn from_values(column: &str, values: &[Option<f64>]) -> Self {
        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let var = sorted.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        });

        Self {
            column: column.to_string(),
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            q75: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Linear-interpolated percentile of an ascending slice
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

pub fn describe_numeric(table: &Table) -> Vec<NumericSummary> {
    table
        .columns()
        .iter()
        .filter_map(|c| {
            c.data
                .as_f64()
                .map(|values| NumericSummary::from_values(&c.name, &values))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

pub fn describe_text(table: &Table) -> Vec<TextSummary> {
    table
        .columns()
        .iter()
        .filter_map(|c| match &c.data {
            ColumnData::Text(values) => {
                let counts = value_counts(values.iter().flatten().cloned());
                let (top, freq) = counts
                    .first()
                    .map_or((None, 0), |(v, n)| (Some(v.clone()), *n));
                Some(TextSummary {
                    column: c.name.clone(),
                    count: values.iter().flatten().count(),
                    unique: counts.len(),
                    top,
                    freq,
                })
            }
            _ => None,
        })
        .collect()
}

/// Frequencies in descending order; ties keep first-seen order
fn value_counts(values: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        let entry = counts.entry(value.clone()).or_insert(0);
        if *entry == 0 {
            order.push(value);
        }
        *entry += 1;
    }
    let mut result: Vec<(String, usize)> = order
        .into_iter()
        .map(|v| {
            let n = counts.get(&v).copied().unwrap_or(0);
            (v, n)
        })
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

//==============================================================================
// Column profiles
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub column_type: ColumnType,
    pub nulls: usize,
    pub null_ratio: f64,
    pub unique: usize,
    pub numeric: Option<NumericSummary>,
    pub top_values: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ProfileEntry {
    Found(ColumnProfile),
    NotFound(String),
}

pub fn profile_columns(table: &Table, names: &[String]) -> Vec<ProfileEntry> {
    names
        .iter()
        .map(|name| {
            let Some(column) = table.column(name) else {
                return ProfileEntry::NotFound(name.clone());
            };
            let rendered: Vec<String> = (0..column.len())
                .map(|row| column.data.cell(row))
                .filter(|cell| !cell.is_null())
                .map(|cell| cell.render())
                .collect();
            let unique = rendered.iter().collect::<HashSet<_>>().len();
            let nulls = column.data.null_count();
            let null_ratio = if column.is_empty() {
                0.0
            } else {
                nulls as f64 / column.len() as f64
            };
            let numeric = column
                .data
                .as_f64()
                .map(|values| NumericSummary::from_values(name, &values));
            let top_values = if numeric.is_some() {
                Vec::new()
            } else {
                value_counts(rendered.into_iter())
                    .into_iter()
                    .take(TOP_VALUES)
                    .collect()
            };

            ProfileEntry::Found(ColumnProfile {
                column: name.clone(),
                column_type: column.column_type(),
                nulls,
                null_ratio,
                unique,
                numeric,
                top_values,
            })
        })
        .collect()
}

//==============================================================================
// Missing values, duplicates, outliers
//==============================================================================

pub fn missing(table: &Table) -> Vec<(String, usize)> {
    table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.data.null_count()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateReport {
    pub count: usize,
    /// Indices of the first few rows that repeat an earlier row
    pub examples: Vec<usize>,
}

pub fn duplicates(table: &Table) -> DuplicateReport {
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
    let mut count = 0;
    let mut examples = Vec::new();

    for row in 0..table.row_count() {
        let key: Vec<Option<String>> = table
            .row(row)
            .into_iter()
            .map(|cell| match cell {
                CellValue::Null => None,
                other => Some(other.render()),
            })
            .collect();
        if !seen.insert(key) {
            count += 1;
            if examples.len() < SAMPLE_LIMIT {
                examples.push(row);
            }
        }
    }

    DuplicateReport { count, examples }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub column: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub samples: Vec<f64>,
}

/// Values outside [Q1 − 1.5·IQR, Q3 + 1.5·IQR]; only columns with outliers are returned
pub fn outliers_iqr(table: &Table) -> Vec<OutlierReport> {
    let mut reports = Vec::new();
    for column in table.columns() {
        let Some(values) = column.data.as_f64() else {
            continue;
        };
        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let (Some(q1), Some(q3)) = (percentile(&sorted, 0.25), percentile(&sorted, 0.75)) else {
            continue;
        };
        let iqr = q3 - q1;
        let lower = q1 - 1.5 * iqr;
        let upper = q3 + 1.5 * iqr;

        let outside: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| *v < lower || *v > upper)
            .collect();
        if outside.is_empty() {
            continue;
        }
        reports.push(OutlierReport {
            column: column.name.clone(),
            lower,
            upper,
            count: outside.len(),
            samples: outside.into_iter().take(SAMPLE_LIMIT).collect(),
        });
    }
    reports
}

//==============================================================================
// Correlation
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub columns: Vec<String>,
    /// `None` where a pair has fewer than two complete rows or zero variance
    pub matrix: Vec<Vec<Option<f64>>>,
}

pub fn correlation(table: &Table) -> Result<Correlation, AnalysisError> {
    let numeric: Vec<(String, Vec<Option<f64>>)> = table
        .columns()
        .iter()
        .filter_map(|c| c.data.as_f64().map(|v| (c.name.clone(), v)))
        .collect();
    if numeric.len() < 2 {
        return Err(AnalysisError::NotEnoughNumericColumns(numeric.len()));
    }

    let matrix = numeric
        .iter()
        .map(|(_, a)| numeric.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();

    Ok(Correlation {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        matrix,
    })
}

/// Pearson coefficient over rows where both values are present
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

//==============================================================================
// Time series
//==============================================================================

/// First datetime column against first numeric column, sorted by time
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub time_column: String,
    pub value_column: String,
    pub points: Vec<(Timestamp, f64)>,
}

pub fn time_series(table: &Table) -> Result<TimeSeries, AnalysisError> {
    let time = table.columns().iter().find_map(|c| match &c.data {
        ColumnData::DateTime(values) => Some((c.name.clone(), values)),
        _ => None,
    });
    let value = table
        .columns()
        .iter()
        .find_map(|c| c.data.as_f64().map(|v| (c.name.clone(), v)));
    let (Some((time_column, times)), Some((value_column, values))) = (time, value) else {
        return Err(AnalysisError::NoTimeSeriesColumns);
    };

    let mut points: Vec<(Timestamp, f64)> = times
        .iter()
        .zip(&values)
        .filter_map(|(t, v)| Some(((*t)?, (*v)?)))
        .collect();
    if points.is_empty() {
        return Err(AnalysisError::EmptyTimeSeries);
    }
    // Offset-aware values order by instant
    points.sort_by_key(|(ts, _)| {
        let shift = ts.offset.map_or(0, |offset| offset.local_minus_utc());
        ts.wall - chrono::Duration::seconds(shift.into())
    });

    Ok(TimeSeries {
        time_column,
        value_column,
        points,
    })
}

//==============================================================================
// Text reports
//==============================================================================

fn opt(n: Option<f64>) -> String {
    n.map_or_else(|| "-".to_string(), format_number)
}

fn render_numeric(out: &mut String, s: &NumericSummary) {
    let _ = writeln!(
        out,
        "   {}: count={} mean={} std={} min={} 25%={} 50%={} 75%={} max={}",
        s.column,
        s.count,
        opt(s.mean),
        opt(s.std),
        opt(s.min),
        opt(s.q25),
        opt(s.median),
        opt(s.q75),
        opt(s.max)
    );
}

/// Run an analysis and render it as human-readable text
pub fn report(
    table: &Table,
    kind: AnalysisKind,
    columns: &[String],
) -> Result<String, AnalysisError> {
    let mut out = String::new();
    match kind {
        AnalysisKind::Summary => {
            let info = dataset_info(table);
            let _ = writeln!(out, "Dataset: {} rows × {} columns", info.rows, info.columns);
            let _ = writeln!(out, "Missing values (total): {}", info.null_count);
            let _ = writeln!(out, "Types:");
            for (name, ty) in &info.types {
                let _ = writeln!(out, "   {} — {}", name, ty);
            }

            let _ = writeln!(out, "\nNumeric statistics:");
            let numeric = describe_numeric(table);
            if numeric.is_empty() {
                let _ = writeln!(out, "   (no numeric columns)");
            }
            for s in &numeric {
                render_numeric(&mut out, s);
            }

            let _ = writeln!(out, "\nCategorical statistics:");
            let text = describe_text(table);
            if text.is_empty() {
                let _ = writeln!(out, "   (no text columns)");
            }
            for s in &text {
                let _ = writeln!(
                    out,
                    "   {}: count={} unique={} top={} freq={}",
                    s.column,
                    s.count,
                    s.unique,
                    s.top.as_deref().unwrap_or("-"),
                    s.freq
                );
            }
        }
        AnalysisKind::Profile => {
            let names: Vec<String> = if columns.is_empty() {
                table.columns().iter().map(|c| c.name.clone()).collect()
            } else {
                columns.to_vec()
            };
            for entry in profile_columns(table, &names) {
                match entry {
                    ProfileEntry::NotFound(name) => {
                        let _ = writeln!(out, "⚠ column '{}' not found", name);
                    }
                    ProfileEntry::Found(p) => {
                        let _ = writeln!(out, "Column: {}", p.column);
                        let _ = writeln!(out, "   type: {}", p.column_type);
                        let _ = writeln!(
                            out,
                            "   nulls: {} ({:.1}%)",
                            p.nulls,
                            p.null_ratio * 100.0
                        );
                        let _ = writeln!(out, "   unique: {}", p.unique);
                        if let Some(numeric) = &p.numeric {
                            render_numeric(&mut out, numeric);
                        } else if p.top_values.is_empty() {
                            let _ = writeln!(out, "   (no non-null values)");
                        } else {
                            let _ = writeln!(out, "   top values:");
                            for (value, n) in &p.top_values {
                                let _ = writeln!(out, "      {}: {}", value, n);
                            }
                        }
                    }
                }
            }
        }
        AnalysisKind::Missing => {
            let _ = writeln!(out, "Missing per column:");
            for (name, n) in missing(table) {
                let _ = writeln!(out, "   {}: {}", name, n);
            }
        }
        AnalysisKind::Duplicates => {
            let dup = duplicates(table);
            let _ = writeln!(out, "Duplicate rows: {}", dup.count);
            if !dup.examples.is_empty() {
                let rows = dup
                    .examples
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "   first duplicate row indices: {}", rows);
            }
        }
        AnalysisKind::Outliers => {
            if describe_numeric(table).is_empty() {
                let _ = writeln!(out, "No numeric columns for outlier detection.");
                return Ok(out);
            }
            let reports = outliers_iqr(table);
            let _ = writeln!(out, "Outliers by IQR:");
            if reports.is_empty() {
                let _ = writeln!(out, "   none detected");
            }
            for r in &reports {
                let samples = r
                    .samples
                    .iter()
                    .map(|v| format_number(*v))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "   {}: {} outliers outside [{}, {}] e.g. {}",
                    r.column,
                    r.count,
                    format_number(r.lower),
                    format_number(r.upper),
                    samples
                );
            }
        }
        AnalysisKind::Correlation => {
            let corr = correlation(table)?;
            let _ = writeln!(out, "Correlation (pearson):");
            let _ = writeln!(out, "   {}", corr.columns.join(" | "));
            for (name, row) in corr.columns.iter().zip(&corr.matrix) {
                let cells = row
                    .iter()
                    .map(|v| v.map_or_else(|| "-".to_string(), |c| format!("{:.3}", c)))
                    .collect::<Vec<_>>()
                    .join(" | ");
                let _ = writeln!(out, "   {}: {}", name, cells);
            }
        }
        AnalysisKind::TimeSeries => {
            let series = time_series(table)?;
            let _ = writeln!(
                out,
                "Time series: {} by {} ({} points)",
                series.value_column,
                series.time_column,
                series.points.len()
            );
            for (ts, v) in &series.points {
                let _ = writeln!(out, "   {}  {}", ts, format_number(*v));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new(
                "x",
                ColumnData::Float(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(100.0)]),
            ),
            Column::new(
                "y",
                ColumnData::Integer(vec![Some(2), Some(4), Some(6), Some(8), None]),
            ),
            Column::new(
                "city",
                ColumnData::Text(vec![
                    Some("Rio".into()),
                    Some("SP".into()),
                    Some("Rio".into()),
                    None,
                    Some("BH".into()),
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1234567), "0.123457");
        assert_eq!(format_number(-0.0000001), "0");
    }

    #[test]
    fn test_percentile_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.25), Some(1.75));
        assert_eq!(percentile(&sorted, 0.5), Some(2.5));
        assert_eq!(percentile(&sorted, 1.0), Some(4.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_describe_numeric() {
        let stats = describe_numeric(&sample());
        assert_eq!(stats.len(), 2);
        let y = &stats[1];
        assert_eq!(y.column, "y");
        assert_eq!(y.count, 4);
        assert_eq!(y.mean, Some(5.0));
        assert_eq!(y.min, Some(2.0));
        assert_eq!(y.max, Some(8.0));
        let std = y.std.unwrap();
        assert!((std - 2.581988897).abs() < 1e-6);
    }

    #[test]
    fn test_describe_text() {
        let stats = describe_text(&sample());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 4);
        assert_eq!(stats[0].unique, 3);
        assert_eq!(stats[0].top.as_deref(), Some("Rio"));
        assert_eq!(stats[0].freq, 2);
    }

    #[test]
    fn test_profile_reports_unknown_column() {
        let entries = profile_columns(&sample(), &["city".to_string(), "ghost".to_string()]);
        assert_eq!(entries.len(), 2);
        match &entries[0] {
            ProfileEntry::Found(p) => {
                assert_eq!(p.nulls, 1);
                assert_eq!(p.unique, 3);
                assert_eq!(p.top_values[0], ("Rio".to_string(), 2));
            }
            other => panic!("Expected profile, got {:?}", other),
        }
        assert_eq!(entries[1], ProfileEntry::NotFound("ghost".to_string()));
    }

    #[test]
    fn test_missing_counts() {
        assert_eq!(
            missing(&sample()),
            vec![("x".into(), 0), ("y".into(), 1), ("city".into(), 1)]
        );
    }

    #[test]
    fn test_duplicates() {
        let table = Table::from_columns(vec![Column::new(
            "a",
            ColumnData::Text(vec![Some("1".into()), None, Some("1".into()), None, Some("2".into())]),
        )])
        .unwrap();
        let dup = duplicates(&table);
        assert_eq!(dup.count, 2);
        assert_eq!(dup.examples, vec![2, 3]);
    }

    #[test]
    fn test_outliers_iqr() {
        let reports = outliers_iqr(&sample());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].column, "x");
        assert_eq!(reports[0].count, 1);
        assert_eq!(reports[0].samples, vec![100.0]);
    }

    #[test]
    fn test_correlation_perfect() {
        let corr = correlation(&sample()).unwrap();
        assert_eq!(corr.columns, vec!["x", "y"]);
        let xy = corr.matrix[0][1].unwrap();
        // rows 0..4 complete: x = 1..4, y = 2x
        assert!((xy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_needs_two_numeric_columns() {
        let table = Table::from_columns(vec![Column::new(
            "only",
            ColumnData::Float(vec![Some(1.0)]),
        )])
        .unwrap();
        assert_eq!(
            correlation(&table),
            Err(AnalysisError::NotEnoughNumericColumns(1))
        );
    }

    fn day(d: u32) -> Option<Timestamp> {
        chrono::NaiveDate::from_ymd_opt(2024, 1, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Timestamp::naive)
    }

    #[test]
    fn test_time_series_sorted_without_nulls() {
        let table = Table::from_columns(vec![
            Column::new("label", ColumnData::Text(vec![None, None, None, None])),
            Column::new("when", ColumnData::DateTime(vec![day(3), day(1), None, day(2)])),
            Column::new(
                "sales",
                ColumnData::Float(vec![Some(30.0), Some(10.0), Some(99.0), None]),
            ),
            Column::new("units", ColumnData::Integer(vec![Some(1); 4])),
        ])
        .unwrap();
        let series = time_series(&table).unwrap();
        assert_eq!(series.time_column, "when");
        assert_eq!(series.value_column, "sales");
        assert_eq!(
            series.points,
            vec![(day(1).unwrap(), 10.0), (day(3).unwrap(), 30.0)]
        );

        let text = report(&table, AnalysisKind::TimeSeries, &[]).unwrap();
        assert!(text.starts_with("Time series: sales by when (2 points)"));
        assert!(text.contains("   2024-01-01 00:00:00  10\n   2024-01-03 00:00:00  30\n"));
    }

    #[test]
    fn test_time_series_needs_datetime_and_numeric() {
        assert_eq!(time_series(&sample()), Err(AnalysisError::NoTimeSeriesColumns));

        let table = Table::from_columns(vec![
            Column::new("when", ColumnData::DateTime(vec![day(1), None])),
            Column::new("v", ColumnData::Float(vec![None, Some(1.0)])),
        ])
        .unwrap();
        assert_eq!(time_series(&table), Err(AnalysisError::EmptyTimeSeries));
    }

    #[test]
    fn test_report_summary_mentions_shape() {
        let text = report(&sample(), AnalysisKind::Summary, &[]).unwrap();
        assert!(text.contains("5 rows × 3 columns"));
        assert!(text.contains("city: count=4 unique=3 top=Rio freq=2"));
    }

    #[test]
    fn test_analysis_kind_from_str() {
        assert_eq!("Outliers".parse::<AnalysisKind>().unwrap(), AnalysisKind::Outliers);
        assert_eq!("time-series".parse::<AnalysisKind>().unwrap(), AnalysisKind::TimeSeries);
        assert!("plot".parse::<AnalysisKind>().is_err());
    }
}
