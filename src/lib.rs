//! GridX - spreadsheet column typing, editing and preview
//!
//! This library loads CSV/TSV files and workbooks into a typed in-memory
//! table, infers semantic column types, applies column edits and writes the
//! result back out.
//!
//! # Features
//!
//! - CSV/TSV with delimiter sniffing and Windows-1252 fallback
//! - xlsx/xlsm/xlsb/xls/ods import, xlsx export
//! - Datetime/numeric inference over text columns (configurable order and threshold)
//! - Add, rename, delete and retype columns with all-or-nothing validation
//! - Row preview with shape and null counts
//! - Exploratory analyses (summary, profile, missing, duplicates, outliers, correlation)
//!
//! # Example
//!
//! ```no_run
//! use gridx::config::Settings;
//! use gridx::core::{Edit, Session};
//! use std::path::Path;
//!
//! let mut session = Session::new(Settings::default())?;
//! session.open(Path::new("sales.csv"), None)?;
//! session.apply(&Edit::retype(["amount"], gridx::types::ColumnType::Float))?;
//! println!("{}", session.preview()?.render());
//! session.save(Path::new("sales.xlsx"))?;
//! # Ok::<(), gridx::error::GridError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod delimited;
pub mod error;
pub mod excel;
pub mod exporter;
pub mod loader;
pub mod types;

// Re-export commonly used types
pub use config::Settings;
pub use error::{GridError, GridResult};
pub use types::{CellValue, Column, ColumnData, ColumnType, Table};
