//! Explicit editing session: the open document, settings and activity log

use crate::config::Settings;
use crate::core::analysis::{self, AnalysisKind};
use crate::core::editor::{self, Edit};
use crate::core::inference::Inferencer;
use crate::core::preview::Preview;
use crate::error::{GridError, GridResult, LoadError};
use crate::exporter;
use crate::loader::{self, LoadedSource};
use crate::types::{FileFormat, SheetSet, Table};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.time.format("%H:%M:%S"))?;
        if self.level == LogLevel::Error {
            write!(f, "error: ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// Timestamped record of what happened in a session, mirrored to tracing
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.push(LogLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{}", message);
        self.push(LogLevel::Error, message);
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.entries.push(LogEntry {
            time: Local::now(),
            level,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The file currently open in a session
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub format: FileFormat,
    pub sheets: SheetSet,
    pub table: Table,
}

pub struct Session {
    settings: Settings,
    inferencer: Inferencer,
    document: Option<Document>,
    log: ActivityLog,
}

impl Session {
    pub fn new(settings: Settings) -> GridResult<Self> {
        settings.validate()?;
        let inferencer = Inferencer::new(&settings)?;
        Ok(Self {
            settings,
            inferencer,
            document: None,
            log: ActivityLog::default(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.document.as_ref().map(|d| &d.table)
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Open a file, replacing any current table (unsaved edits are discarded)
    pub fn open(&mut self, path: &Path, sheet: Option<&str>) -> GridResult<&Table> {
        let loaded = self.track(loader::load(path, sheet, &self.inferencer))?;
        let LoadedSource {
            format,
            sheets,
            table,
        } = loaded;
        self.log.info(format!(
            "opened {} ({} rows × {} columns)",
            path.display(),
            table.row_count(),
            table.column_count()
        ));
        let document = self.document.insert(Document {
            path: path.to_path_buf(),
            format,
            sheets,
            table,
        });
        Ok(&document.table)
    }

    /// Reload the open file from another of its sheets
    pub fn select_sheet(&mut self, name: &str) -> GridResult<&Table> {
        let path = self.require_document()?.path.clone();
        let loaded = self.track(loader::load(&path, Some(name), &self.inferencer))?;
        self.log.info(format!(
            "switched to sheet '{}' ({} rows × {} columns)",
            name,
            loaded.table.row_count(),
            loaded.table.column_count()
        ));
        let document = self.document.insert(Document {
            path,
            format: loaded.format,
            sheets: loaded.sheets,
            table: loaded.table,
        });
        Ok(&document.table)
    }

    /// Apply an edit to the open table.
    ///
    /// A partially successful retype keeps the converted columns and still
    /// returns the failures.
    pub fn apply(&mut self, edit: &Edit) -> GridResult<String> {
        let table = self.require_table()?;
        let outcome = editor::apply(table, edit);
        if let Some(err) = outcome.error {
            if outcome.table != *table {
                self.replace_table(outcome.table);
            }
            self.log.error(err.to_string());
            return Err(err);
        }
        self.log.info(outcome.message.clone());
        self.replace_table(outcome.table);
        Ok(outcome.message)
    }

    /// Save the open table; the session keeps it open afterwards
    pub fn save(&mut self, path: &Path) -> GridResult<()> {
        let document = self.require_document()?;
        let sheet = document.sheets.active().map(str::to_string);
        let result = exporter::save(&document.table, path, sheet.as_deref(), &self.settings);
        self.track(result)?;
        self.log.info(format!("saved {}", path.display()));
        Ok(())
    }

    /// Drop the open document
    pub fn reset(&mut self) {
        if self.document.take().is_some() {
            self.log.info("session reset");
        }
    }

    pub fn preview(&self) -> GridResult<Preview> {
        let table = self.require_table()?;
        Ok(Preview::build(table, self.settings.preview_rows))
    }

    pub fn analyze(&mut self, kind: AnalysisKind, columns: &[String]) -> GridResult<String> {
        let table = self.require_table()?;
        let result = analysis::report(table, kind, columns).map_err(GridError::from);
        self.track(result)
    }

    fn replace_table(&mut self, table: Table) {
        if let Some(document) = self.document.as_mut() {
            document.table = table;
        }
    }

    fn require_document(&self) -> GridResult<&Document> {
        self.document.as_ref().ok_or(GridError::NoTable)
    }

    fn require_table(&self) -> GridResult<&Table> {
        self.table().ok_or(GridError::NoTable)
    }

    /// Record a failure in the activity log before handing it back
    fn track<T>(&mut self, result: GridResult<T>) -> GridResult<T> {
        if let Err(e) = &result {
            self.log.error(e.to_string());
        }
        result
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("document", &self.document.as_ref().map(|d| &d.path))
            .field("log_entries", &self.log.len())
            .finish()
    }
}

/// Sheets of the open document, or an error when it has only one
pub fn switchable_sheets(session: &Session) -> GridResult<&SheetSet> {
    let document = session.document().ok_or(GridError::NoTable)?;
    if document.format.is_delimited() {
        return Err(LoadError::SingleSheet(document.path.display().to_string()).into());
    }
    Ok(&document.sheets)
}
