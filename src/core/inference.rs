//! Semantic type inference for textual columns
//!
//! A text column is reclassified as datetime or numeric when more than
//! `threshold` of its rows parse as that type. Null rows count against the
//! ratio, so a sparse column stays text. Values that fail to parse become null. The attempt order is fixed per [`InferenceOrder`].

use crate::config::{InferenceOrder, Settings};
use crate::error::{GridError, GridResult};
use crate::types::{Column, ColumnData, Table, Timestamp};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use tracing::debug;

/// Naive date+time layouts, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date+time layouts carrying a UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a datetime from common ISO and day-first layouts.
///
/// Bare digit strings are never dates, so columns of small integers
/// stay numeric regardless of the inference order.
pub fn parse_datetime(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if s.is_empty() || s.trim_start_matches(['+', '-']).chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(aware(dt));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(aware(dt));
        }
    }

    // "...Z" with a space separator is not RFC 3339
    if let Some(body) = s.strip_suffix(['Z', 'z']) {
        if let Some(wall) = parse_naive(body) {
            return Some(Timestamp::with_offset(wall, FixedOffset::east_opt(0)?));
        }
        return None;
    }

    parse_naive(s).map(Timestamp::naive)
}

fn aware(dt: DateTime<FixedOffset>) -> Timestamp {
    Timestamp::with_offset(dt.naive_local(), *dt.offset())
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Parse a finite number, accepting a decimal comma
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Column type inferencer configured from [`Settings`]
pub struct Inferencer {
    threshold: f64,
    order: InferenceOrder,
    integer_pattern: Regex,
}

impl Inferencer {
    pub fn new(settings: &Settings) -> GridResult<Self> {
        let integer_pattern = Regex::new(r"^[+-]?\d+$")
            .map_err(|e| GridError::Config(format!("Regex error: {}", e)))?;
        Ok(Self {
            threshold: settings.threshold,
            order: settings.inference_order,
            integer_pattern,
        })
    }

    /// Run inference over every text column of a freshly loaded table
    pub fn infer_table(&self, table: Table) -> GridResult<Table> {
        let columns = table
            .columns()
            .iter()
            .map(|column| {
                let data = self.infer_column(&column.data);
                if data.column_type() != column.column_type() {
                    debug!(
                        column = %column.name,
                        from = %column.column_type(),
                        to = %data.column_type(),
                        "inferred column type"
                    );
                }
                Column::new(column.name.clone(), data)
            })
            .collect::<Vec<_>>();

        if columns.is_empty() {
            return Ok(Table::with_rows(table.row_count()));
        }
        Table::from_columns(columns)
    }

    /// Infer a single column; non-text storage is returned unchanged
    pub fn infer_column(&self, data: &ColumnData) -> ColumnData {
        let ColumnData::Text(values) = data else {
            return data.clone();
        };

        if values.iter().all(Option::is_none) {
            return data.clone();
        }

        let attempts: [fn(&Self, &[Option<String>]) -> Option<ColumnData>; 2] =
            match self.order {
                InferenceOrder::DateTimeFirst => [Self::try_datetime, Self::try_numeric],
                InferenceOrder::NumericFirst => [Self::try_numeric, Self::try_datetime],
            };

        attempts
            .iter()
            .find_map(|attempt| attempt(self, values))
            .unwrap_or_else(|| data.clone())
    }

    /// Parsed share of all rows, nulls included, must exceed the threshold
    fn accepts(&self, parsed: usize, rows: usize) -> bool {
        parsed > 0 && (parsed as f64 / rows as f64) > self.threshold
    }

    fn try_datetime(&self, values: &[Option<String>]) -> Option<ColumnData> {
        let parsed: Vec<Option<Timestamp>> = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_datetime))
            .collect();
        let hits = parsed.iter().flatten().count();
        self.accepts(hits, values.len())
            .then_some(ColumnData::DateTime(parsed))
    }

    fn try_numeric(&self, values: &[Option<String>]) -> Option<ColumnData> {
        let parsed: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_number))
            .collect();
        let hits = parsed.iter().flatten().count();
        if !self.accepts(hits, values.len()) {
            return None;
        }

        let all_integers = values
            .iter()
            .zip(&parsed)
            .filter(|(_, p)| p.is_some())
            .all(|(raw, _)| {
                raw.as_deref()
                    .map(str::trim)
                    .is_some_and(|s| self.integer_pattern.is_match(s) && s.parse::<i64>().is_ok())
            });

        if all_integers {
            let ints = values
                .iter()
                .zip(&parsed)
                .map(|(raw, p)| {
                    p.and_then(|_| raw.as_deref().and_then(|s| s.trim().parse::<i64>().ok()))
                })
                .collect();
            Some(ColumnData::Integer(ints))
        } else {
            Some(ColumnData::Float(parsed))
        }
    }
}
