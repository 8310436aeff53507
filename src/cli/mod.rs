//! CLI command handlers

pub mod commands;
pub mod shell;

pub use commands::{analyze, convert, info, preview, shell, ConvertEdits};
