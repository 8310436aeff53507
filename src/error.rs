use std::path::PathBuf;
use thiserror::Error;

pub type GridResult<T> = Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No table loaded")]
    NoTable,

    #[error("Invalid command: {0}")]
    Command(String),
}

/// Failures while reading a tabular file into memory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("parse failure: {0}")]
    Parse(String),

    #[error("sheet '{name}' not found (available: {available})")]
    UnknownSheet { name: String, available: String },

    #[error("'{0}' has a single sheet; nothing to switch")]
    SingleSheet(String),
}

/// A column that could not be converted during a retype batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RetypeFailure {
    pub column: String,
    pub reason: String,
}

impl std::fmt::Display for RetypeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.column, self.reason)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("column '{0}' already exists")]
    NameCollision(String),

    #[error("column '{0}' not found")]
    UnknownColumn(String),

    #[error("invalid column name '{0}'")]
    InvalidName(String),

    #[error("column '{0}' is renamed more than once")]
    DuplicateRename(String),

    #[error("{} column(s) failed to convert: {}", .failures.len(), join_failures(.failures))]
    Retype { failures: Vec<RetypeFailure> },
}

fn join_failures(failures: &[RetypeFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("cannot write '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("unsupported output format: '{0}'")]
    UnsupportedFormat(String),

    #[error("unsupported content: {0}")]
    UnsupportedContent(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("need at least 2 numeric columns, found {0}")]
    NotEnoughNumericColumns(usize),

    #[error("unknown analysis '{0}'")]
    UnknownAnalysis(String),

    #[error("time series needs one datetime and one numeric column")]
    NoTimeSeriesColumns,

    #[error("time series has no rows with both a date and a value")]
    EmptyTimeSeries,
}
