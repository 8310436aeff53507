use crate::config::Settings;
use crate::core::analysis::AnalysisKind;
use crate::core::editor::{Edit, Fill};
use crate::core::inference::{parse_datetime, parse_number};
use crate::core::session::Session;
use crate::error::{GridError, GridResult};
use crate::types::{CellValue, ColumnType};
use colored::Colorize;
use std::io;
use std::path::PathBuf;

/// Edits requested on the `convert` command line
#[derive(Debug, Clone, Default)]
pub struct ConvertEdits {
    pub add: Vec<String>,
    pub rename: Vec<String>,
    pub retype: Vec<String>,
    pub drop: Vec<String>,
}

/// Execute the info command
pub fn info(file: PathBuf, sheet: Option<String>, settings: Settings) -> GridResult<()> {
    let mut session = Session::new(settings)?;
    session.open(&file, sheet.as_deref())?;

    println!("{}", "📋 GridX - File Info".bold().green());
    println!("   File: {}", file.display());

    if let Some(document) = session.document() {
        println!("   Format: {:?}", document.format);
        let sheets = document
            .sheets
            .names()
            .iter()
            .map(|name| {
                if Some(name.as_str()) == document.sheets.active() {
                    name.bright_blue().bold().to_string()
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("   Sheets: {}\n", sheets);
    }

    let preview = session.preview()?;
    println!("{}", "📊 Columns:".bold().cyan());
    for line in preview.column_listing() {
        println!("   {}", line);
    }
    println!();
    println!("   {}", preview.summary_line());
    Ok(())
}

/// Execute the preview command
pub fn preview(
    file: PathBuf,
    sheet: Option<String>,
    rows: Option<usize>,
    json: bool,
    mut settings: Settings,
) -> GridResult<()> {
    if let Some(rows) = rows {
        settings.preview_rows = rows;
    }
    let mut session = Session::new(settings)?;
    session.open(&file, sheet.as_deref())?;
    let preview = session.preview()?;

    if json {
        let text = serde_json::to_string_pretty(&preview)
            .map_err(|e| GridError::Command(format!("Failed to serialize preview: {}", e)))?;
        println!("{}", text);
    } else {
        print!("{}", preview.render());
    }
    Ok(())
}

/// Execute the convert command: load, apply edits (add, rename, retype, drop), save
pub fn convert(
    input: PathBuf,
    output: PathBuf,
    sheet: Option<String>,
    edits: ConvertEdits,
    settings: Settings,
) -> GridResult<()> {
    println!("{}", "🔄 GridX - Convert".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let plan = plan_edits(&edits)?;

    let mut session = Session::new(settings)?;
    session.open(&input, sheet.as_deref())?;

    for edit in &plan {
        let message = session.apply(edit)?;
        println!("   {} {}", "✓".green(), message);
    }

    session.save(&output)?;
    if let Some(table) = session.table() {
        println!(
            "\n{} {} rows × {} columns written",
            "✅".green(),
            table.row_count(),
            table.column_count()
        );
    }
    Ok(())
}

/// Execute the analyze command
pub fn analyze(
    file: PathBuf,
    sheet: Option<String>,
    kind: String,
    columns: Vec<String>,
    settings: Settings,
) -> GridResult<()> {
    let kind: AnalysisKind = kind.parse()?;
    let mut session = Session::new(settings)?;
    session.open(&file, sheet.as_deref())?;

    println!("{}", format!("🔍 GridX - Analysis ({:?})", kind).bold().green());
    println!("   File: {}\n", file.display());
    print!("{}", session.analyze(kind, &columns)?);
    Ok(())
}

/// Execute the shell command over stdin/stdout
pub fn shell(file: Option<PathBuf>, settings: Settings) -> GridResult<()> {
    let mut session = Session::new(settings)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    super::shell::run(&mut session, file, stdin.lock(), stdout.lock())
}

/// Build the edit sequence for `convert` in its fixed order: add, rename, retype, drop
pub fn plan_edits(edits: &ConvertEdits) -> GridResult<Vec<Edit>> {
    let mut plan = Vec::new();

    for spec in &edits.add {
        plan.push(parse_add(spec)?);
    }

    if !edits.rename.is_empty() {
        let pairs = edits
            .rename
            .iter()
            .map(|spec| split_pair(spec, "--rename"))
            .collect::<GridResult<Vec<_>>>()?;
        plan.push(Edit::rename(pairs));
    }

    // One retype batch per target type, in first-seen order
    let mut batches: Vec<(ColumnType, Vec<String>)> = Vec::new();
    for spec in &edits.retype {
        let (column, ty) = split_pair(spec, "--retype")?;
        let target = ColumnType::parse(&ty)?;
        match batches.iter_mut().find(|(t, _)| *t == target) {
            Some((_, names)) => names.push(column),
            None => batches.push((target, vec![column])),
        }
    }
    for (target, names) in batches {
        plan.push(Edit::retype(names, target));
    }

    if !edits.drop.is_empty() {
        plan.push(Edit::delete(edits.drop.iter().cloned()));
    }

    Ok(plan)
}

/// Parse `NAME` (null-filled) or `NAME=VALUE` (constant-filled)
pub fn parse_add(spec: &str) -> GridResult<Edit> {
    match spec.split_once('=') {
        None => Ok(Edit::add(spec.trim(), Fill::Null)),
        Some((name, value)) => Ok(Edit::add(
            name.trim(),
            Fill::Constant(parse_constant(value)),
        )),
    }
}

/// Read a constant fill value, preferring integer, then float, boolean, datetime and text
pub fn parse_constant(raw: &str) -> CellValue {
    let value = raw.trim();
    if value.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = value.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Some(f) = parse_number(value) {
        return CellValue::Float(f);
    }
    match value.to_lowercase().as_str() {
        "true" => return CellValue::Boolean(true),
        "false" => return CellValue::Boolean(false),
        _ => {}
    }
    if let Some(ts) = parse_datetime(value) {
        return CellValue::DateTime(ts);
    }
    CellValue::Text(value.to_string())
}

/// Split `LEFT=RIGHT`; both sides must be non-empty
pub fn split_pair(spec: &str, flag: &str) -> GridResult<(String, String)> {
    match spec.split_once('=') {
        Some((left, right)) if !left.trim().is_empty() && !right.trim().is_empty() => {
            Ok((left.trim().to_string(), right.trim().to_string()))
        }
        _ => Err(GridError::Command(format!(
            "{} expects LEFT=RIGHT, got '{}'",
            flag, spec
        ))),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
