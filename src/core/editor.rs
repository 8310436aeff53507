//! Column editing commands
//!
//! Every edit is a pure function from the current table to an [`EditOutcome`]:
//! the resulting table, a log line, and an optional error. Failed edits return
//! the input table unchanged, except retype batches, which keep the columns
//! that converted and report the rest.

use crate::core::inference::{parse_datetime, parse_number};
use crate::error::{EditError, GridError, RetypeFailure};
use crate::types::{CellValue, Column, ColumnData, ColumnType, Table, Timestamp};
use std::collections::HashSet;
use tracing::{info, warn};

/// How a new column is populated
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Null,
    Constant(CellValue),
}

/// A single user action against the table
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Add { name: String, fill: Fill },
    Rename { pairs: Vec<(String, String)> },
    Delete { names: Vec<String> },
    Retype { names: Vec<String>, target: ColumnType },
}

impl Edit {
    pub fn add(name: impl Into<String>, fill: Fill) -> Self {
        Edit::Add {
            name: name.into(),
            fill,
        }
    }

    pub fn rename<S: Into<String>>(pairs: impl IntoIterator<Item = (S, S)>) -> Self {
        Edit::Rename {
            pairs: pairs.into_iter().map(|(a, b)| (a.into(), b.into())).collect(),
        }
    }

    pub fn delete<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Edit::Delete {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn retype<S: Into<String>>(names: impl IntoIterator<Item = S>, target: ColumnType) -> Self {
        Edit::Retype {
            names: names.into_iter().map(Into::into).collect(),
            target,
        }
    }
}

/// Result of applying an [`Edit`]
#[derive(Debug)]
pub struct EditOutcome {
    pub table: Table,
    pub message: String,
    pub error: Option<GridError>,
}

impl EditOutcome {
    fn ok(table: Table, message: String) -> Self {
        Self {
            table,
            message,
            error: None,
        }
    }

    fn rejected(table: &Table, error: EditError) -> Self {
        Self {
            table: table.clone(),
            message: format!("edit rejected: {}", error),
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Apply an edit to a table without touching the original
pub fn apply(table: &Table, edit: &Edit) -> EditOutcome {
    let outcome = match edit {
        Edit::Add { name, fill } => add_column(table, name, fill),
        Edit::Rename { pairs } => rename_columns(table, pairs),
        Edit::Delete { names } => delete_columns(table, names),
        Edit::Retype { names, target } => retype_columns(table, names, *target),
    };
    match &outcome.error {
        None => info!("{}", outcome.message),
        Some(e) => warn!("{}", e),
    }
    outcome
}

fn add_column(table: &Table, name: &str, fill: &Fill) -> EditOutcome {
    let name = name.trim();
    if name.is_empty() {
        return EditOutcome::rejected(table, EditError::InvalidName(name.to_string()));
    }
    if table.contains(name) {
        return EditOutcome::rejected(table, EditError::NameCollision(name.to_string()));
    }

    let data = match fill {
        Fill::Null => ColumnData::nulls(ColumnType::Float, table.row_count()),
        Fill::Constant(value) => ColumnData::filled(value, table.row_count()),
    };

    let mut next = table.clone();
    match next.push_column(Column::new(name, data)) {
        Ok(()) => EditOutcome::ok(next, format!("added column '{}'", name)),
        Err(GridError::Edit(e)) => EditOutcome::rejected(table, e),
        Err(e) => EditOutcome {
            table: table.clone(),
            message: format!("edit rejected: {}", e),
            error: Some(e),
        },
    }
}

fn rename_columns(table: &Table, pairs: &[(String, String)]) -> EditOutcome {
    let mut planned: Vec<(&str, &str)> = Vec::new();
    let mut sources: HashSet<&str> = HashSet::new();
    for (old, new) in pairs {
        if !table.contains(old) {
            return EditOutcome::rejected(table, EditError::UnknownColumn(old.clone()));
        }
        if !sources.insert(old.as_str()) {
            return EditOutcome::rejected(table, EditError::DuplicateRename(old.clone()));
        }
        let new = new.trim();
        if new.is_empty() || new == old.as_str() {
            continue;
        }
        planned.push((old.as_str(), new));
    }

    if planned.is_empty() {
        return EditOutcome::ok(table.clone(), "no columns renamed".to_string());
    }

    // Names after the batch: untouched columns keep theirs
    let renamed: HashSet<&str> = planned.iter().map(|(old, _)| *old).collect();
    let mut taken: HashSet<&str> = table
        .column_names()
        .into_iter()
        .filter(|n| !renamed.contains(n))
        .collect();
    for (_, new) in &planned {
        if !taken.insert(*new) {
            return EditOutcome::rejected(table, EditError::NameCollision(new.to_string()));
        }
    }

    // Resolve positions up front so swaps don't chase their own renames
    let positions: Vec<(usize, &str)> = planned
        .iter()
        .filter_map(|(old, new)| table.position(old).map(|idx| (idx, *new)))
        .collect();
    let mut next = table.clone();
    for (idx, new) in positions {
        next.rename_at(idx, new);
    }
    let summary = planned
        .iter()
        .map(|(old, new)| format!("{} → {}", old, new))
        .collect::<Vec<_>>()
        .join(", ");
    EditOutcome::ok(next, format!("renamed columns: {}", summary))
}

fn delete_columns(table: &Table, names: &[String]) -> EditOutcome {
    if names.is_empty() {
        return EditOutcome::ok(table.clone(), "no columns deleted".to_string());
    }
    if let Some(missing) = names.iter().find(|n| !table.contains(n)) {
        return EditOutcome::rejected(table, EditError::UnknownColumn(missing.clone()));
    }

    let mut next = table.clone();
    for name in names {
        next.remove_column(name);
    }
    EditOutcome::ok(next, format!("deleted columns: {}", names.join(", ")))
}

fn retype_columns(table: &Table, names: &[String], target: ColumnType) -> EditOutcome {
    if names.is_empty() {
        return EditOutcome::ok(table.clone(), "no columns retyped".to_string());
    }

    let mut next = table.clone();
    let mut converted = Vec::new();
    let mut failures = Vec::new();

    for name in names {
        let Some(column) = table.column(name) else {
            failures.push(RetypeFailure {
                column: name.clone(),
                reason: "column not found".to_string(),
            });
            continue;
        };
        match convert(&column.data, target) {
            Ok(data) => match next.replace_data(name, data) {
                Ok(()) => converted.push(name.as_str()),
                Err(e) => failures.push(RetypeFailure {
                    column: name.clone(),
                    reason: e.to_string(),
                }),
            },
            Err(reason) => failures.push(RetypeFailure {
                column: name.clone(),
                reason,
            }),
        }
    }

    let mut message = if converted.is_empty() {
        format!("no columns converted to {}", target)
    } else {
        format!("converted to {}: {}", target, converted.join(", "))
    };
    if failures.is_empty() {
        return EditOutcome::ok(next, message);
    }

    message.push_str(&format!(" ({} failed)", failures.len()));
    EditOutcome {
        table: next,
        message,
        error: Some(EditError::Retype { failures }.into()),
    }
}

/// Convert column storage to `target`; the error names the first offending value
pub fn convert(data: &ColumnData, target: ColumnType) -> Result<ColumnData, String> {
    match target {
        ColumnType::Text => Ok(to_text(data)),
        ColumnType::Integer => to_integer(data),
        ColumnType::Float => to_float(data),
        ColumnType::DateTime => to_datetime(data),
        ColumnType::Boolean => Ok(to_boolean(data)),
    }
}

fn to_text(data: &ColumnData) -> ColumnData {
    if let ColumnData::Text(values) = data {
        return ColumnData::Text(values.clone());
    }
    let values = (0..data.len())
        .map(|row| match data.cell(row) {
            CellValue::Null => None,
            cell => Some(cell.render()),
        })
        .collect();
    ColumnData::Text(values)
}

fn to_integer(data: &ColumnData) -> Result<ColumnData, String> {
    let values = match data {
        ColumnData::Integer(v) => v.clone(),
        ColumnData::Float(v) => v
            .iter()
            .map(|x| x.map(float_to_int).transpose())
            .collect::<Result<_, _>>()?,
        ColumnData::Boolean(v) => v.iter().map(|x| x.map(i64::from)).collect(),
        ColumnData::Text(v) => v
            .iter()
            .map(|x| {
                x.as_deref()
                    .map(|s| {
                        parse_number(s)
                            .ok_or_else(|| format!("'{}' is not a number", s))
                            .and_then(float_to_int)
                    })
                    .transpose()
            })
            .collect::<Result<_, _>>()?,
        ColumnData::DateTime(_) => return Err("cannot convert datetime to integer".to_string()),
    };
    Ok(ColumnData::Integer(values))
}

fn float_to_int(value: f64) -> Result<i64, String> {
    // i64::MAX rounds up to 2^63 as f64, which is already out of range
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(format!("{} cannot be represented as an integer", value));
    }
    Ok(value as i64)
}

fn to_float(data: &ColumnData) -> Result<ColumnData, String> {
    let values = match data {
        ColumnData::Integer(v) => v.iter().map(|x| x.map(|i| i as f64)).collect(),
        ColumnData::Float(v) => v.clone(),
        ColumnData::Boolean(v) => v
            .iter()
            .map(|x| x.map(|b| if b { 1.0 } else { 0.0 }))
            .collect(),
        ColumnData::Text(v) => v
            .iter()
            .map(|x| {
                x.as_deref()
                    .map(|s| parse_number(s).ok_or_else(|| format!("'{}' is not a number", s)))
                    .transpose()
            })
            .collect::<Result<_, _>>()?,
        ColumnData::DateTime(_) => return Err("cannot convert datetime to float".to_string()),
    };
    Ok(ColumnData::Float(values))
}

fn to_datetime(data: &ColumnData) -> Result<ColumnData, String> {
    let values: Vec<Option<Timestamp>> = match data {
        ColumnData::DateTime(v) => v.iter().map(|x| x.map(Timestamp::strip_offset)).collect(),
        ColumnData::Text(v) => v
            .iter()
            .map(|x| {
                x.as_deref()
                    .map(|s| {
                        parse_datetime(s)
                            .map(Timestamp::strip_offset)
                            .ok_or_else(|| format!("'{}' is not a date/time", s))
                    })
                    .transpose()
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(format!(
                "cannot convert {} to datetime",
                other.column_type()
            ))
        }
    };
    Ok(ColumnData::DateTime(values))
}

/// Map a value through the fixed boolean vocabulary; anything else is null
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "sim" => Some(true),
        "false" | "0" | "não" | "nao" => Some(false),
        _ => None,
    }
}

fn to_boolean(data: &ColumnData) -> ColumnData {
    let values = match data {
        ColumnData::Boolean(v) => v.clone(),
        ColumnData::Integer(v) => v
            .iter()
            .map(|x| match x {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            })
            .collect(),
        ColumnData::Float(v) => v
            .iter()
            .map(|x| match x {
                Some(f) if *f == 1.0 => Some(true),
                Some(f) if *f == 0.0 => Some(false),
                _ => None,
            })
            .collect(),
        ColumnData::Text(v) => v
            .iter()
            .map(|x| x.as_deref().and_then(parse_bool))
            .collect(),
        ColumnData::DateTime(v) => vec![None; v.len()],
    };
    ColumnData::Boolean(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(values: &[Option<&str>]) -> ColumnData {
        ColumnData::Text(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("id", ColumnData::Integer(vec![Some(1), Some(2), Some(3)])),
            Column::new("price", text(&[Some("1,5"), Some("2"), None])),
            Column::new("label", text(&[Some("a"), Some("b"), Some("c")])),
        ])
        .unwrap()
    }

    #[test]
    fn test_add_null_column() {
        let table = sample();
        let outcome = apply(&table, &Edit::add("extra", Fill::Null));
        assert!(outcome.is_ok());
        assert_eq!(outcome.table.column_names(), vec!["id", "price", "label", "extra"]);
        assert_eq!(outcome.table.column("extra").unwrap().data.null_count(), 3);
        // original untouched
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_add_constant_column() {
        let outcome = apply(
            &sample(),
            &Edit::add("flag", Fill::Constant(CellValue::Boolean(true))),
        );
        assert_eq!(
            outcome.table.column("flag").unwrap().data,
            ColumnData::Boolean(vec![Some(true); 3])
        );
    }

    #[test]
    fn test_add_collision_rejected() {
        let table = sample();
        let outcome = apply(&table, &Edit::add("id", Fill::Null));
        assert!(matches!(
            outcome.error,
            Some(GridError::Edit(EditError::NameCollision(ref n))) if n == "id"
        ));
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_add_blank_name_rejected() {
        let outcome = apply(&sample(), &Edit::add("   ", Fill::Null));
        assert!(matches!(
            outcome.error,
            Some(GridError::Edit(EditError::InvalidName(_)))
        ));
    }

    #[test]
    fn test_add_then_delete_restores_columns() {
        let table = sample();
        let added = apply(&table, &Edit::add("tmp", Fill::Null)).table;
        let removed = apply(&added, &Edit::delete(["tmp"])).table;
        assert_eq!(removed, table);
    }

    #[test]
    fn test_rename_skips_blank_names() {
        let outcome = apply(&sample(), &Edit::rename([("id", "key"), ("label", "  ")]));
        assert!(outcome.is_ok());
        assert_eq!(outcome.table.column_names(), vec!["key", "price", "label"]);
    }

    #[test]
    fn test_rename_onto_existing_name_rejected() {
        let table = sample();
        let outcome = apply(&table, &Edit::rename([("id", "price")]));
        assert!(matches!(
            outcome.error,
            Some(GridError::Edit(EditError::NameCollision(ref n))) if n == "price"
        ));
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_rename_swap_is_allowed() {
        let outcome = apply(&sample(), &Edit::rename([("id", "label"), ("label", "id")]));
        assert!(outcome.is_ok());
        assert_eq!(outcome.table.column_names(), vec!["label", "price", "id"]);
    }

    #[test]
    fn test_rename_duplicate_targets_rejected() {
        let table = sample();
        let outcome = apply(&table, &Edit::rename([("id", "x"), ("label", "x")]));
        assert!(outcome.error.is_some());
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_rename_same_column_twice_rejected() {
        let table = sample();
        let outcome = apply(&table, &Edit::rename([("id", "x"), ("id", "y")]));
        assert!(matches!(
            outcome.error,
            Some(GridError::Edit(EditError::DuplicateRename(ref n))) if n == "id"
        ));
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_rename_unknown_column_rejected() {
        let outcome = apply(&sample(), &Edit::rename([("nope", "x")]));
        assert!(matches!(
            outcome.error,
            Some(GridError::Edit(EditError::UnknownColumn(_)))
        ));
    }

    #[test]
    fn test_delete_empty_selection_is_noop() {
        let table = sample();
        let outcome = apply(&table, &Edit::delete(Vec::<String>::new()));
        assert!(outcome.is_ok());
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_delete_unknown_leaves_table() {
        let table = sample();
        let outcome = apply(&table, &Edit::delete(["id", "ghost"]));
        assert!(outcome.error.is_some());
        assert_eq!(outcome.table, table);
    }

    #[test]
    fn test_retype_to_boolean_vocabulary() {
        let table = Table::from_columns(vec![Column::new(
            "answer",
            text(&[
                Some("true"),
                Some("Sim"),
                Some("0"),
                Some("NAO"),
                Some("Não"),
                Some("maybe"),
                None,
            ]),
        )])
        .unwrap();
        let outcome = apply(&table, &Edit::retype(["answer"], ColumnType::Boolean));
        assert!(outcome.is_ok());
        assert_eq!(
            outcome.table.column("answer").unwrap().data,
            ColumnData::Boolean(vec![
                Some(true),
                Some(true),
                Some(false),
                Some(false),
                Some(false),
                None,
                None
            ])
        );
    }

    #[test]
    fn test_retype_partial_failure() {
        let table = Table::from_columns(vec![
            Column::new("a", text(&[Some("1"), Some("2")])),
            Column::new("b", text(&[Some("abc"), Some("3")])),
            Column::new("c", text(&[Some("4"), None])),
        ])
        .unwrap();
        let outcome = apply(&table, &Edit::retype(["a", "b", "c"], ColumnType::Integer));

        match &outcome.error {
            Some(GridError::Edit(EditError::Retype { failures })) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].column, "b");
            }
            other => panic!("Expected retype failure, got {:?}", other),
        }
        assert_eq!(
            outcome.table.column("a").unwrap().data,
            ColumnData::Integer(vec![Some(1), Some(2)])
        );
        assert_eq!(
            outcome.table.column("c").unwrap().data,
            ColumnData::Integer(vec![Some(4), None])
        );
        assert_eq!(outcome.table.column("b").unwrap().data, table.column("b").unwrap().data);
    }

    #[test]
    fn test_retype_float_to_integer_requires_whole_numbers() {
        let data = ColumnData::Float(vec![Some(1.0), Some(2.5)]);
        assert!(convert(&data, ColumnType::Integer).is_err());
        let whole = ColumnData::Float(vec![Some(1.0), None]);
        assert_eq!(
            convert(&whole, ColumnType::Integer).unwrap(),
            ColumnData::Integer(vec![Some(1), None])
        );
    }

    #[test]
    fn test_float_to_int_rejects_out_of_range() {
        assert!(float_to_int(9_223_372_036_854_775_808.0).is_err());
        assert!(float_to_int(-9_223_372_036_854_775_808.0 * 2.0).is_err());
        assert_eq!(float_to_int(-9_223_372_036_854_775_808.0), Ok(i64::MIN));
        assert_eq!(float_to_int(4_503_599_627_370_496.0), Ok(4_503_599_627_370_496));
    }

    #[test]
    fn test_retype_text_keeps_nulls() {
        let data = ColumnData::Float(vec![Some(1.5), None]);
        assert_eq!(
            convert(&data, ColumnType::Text).unwrap(),
            text(&[Some("1.5"), None])
        );
    }

    #[test]
    fn test_retype_datetime_strips_offset() {
        let data = text(&[Some("2024-05-01T12:00:00+02:00"), Some("2024-05-02")]);
        let ColumnData::DateTime(values) = convert(&data, ColumnType::DateTime).unwrap() else {
            panic!("Expected datetime column");
        };
        assert!(values.iter().flatten().all(|ts| !ts.is_aware()));
        assert_eq!(values[0].unwrap().wall.to_string(), "2024-05-01 12:00:00");
    }

    #[test]
    fn test_retype_numbers_to_datetime_fails() {
        let data = ColumnData::Integer(vec![Some(1)]);
        assert!(convert(&data, ColumnType::DateTime).is_err());
    }

    #[test]
    fn test_retype_unknown_column_reported() {
        let outcome = apply(&sample(), &Edit::retype(["ghost"], ColumnType::Text));
        assert!(matches!(
            outcome.error,
            Some(GridError::Edit(EditError::Retype { .. }))
        ));
    }
}
