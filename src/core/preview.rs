//! Row preview projection and its terminal rendering

use crate::types::{ColumnType, Table};
use colored::Colorize;
use serde::Serialize;

/// Widest rendered cell before truncation
const MAX_CELL_WIDTH: usize = 24;

/// First rows of a table, rendered to strings, plus shape and null counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub headers: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    pub column_count: usize,
    pub null_count: usize,
}

impl Preview {
    /// Project at most `limit` rows of `table`
    pub fn build(table: &Table, limit: usize) -> Self {
        let shown = table.row_count().min(limit);
        let rows = (0..shown)
            .map(|row| table.row(row).iter().map(|cell| cell.render()).collect())
            .collect();

        Self {
            headers: table.columns().iter().map(|c| c.name.clone()).collect(),
            column_types: table.columns().iter().map(|c| c.column_type()).collect(),
            rows,
            row_count: table.row_count(),
            column_count: table.column_count(),
            null_count: table.null_count(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.row_count
    }

    /// One line per column: `name — type`
    pub fn column_listing(&self) -> Vec<String> {
        self.headers
            .iter()
            .zip(&self.column_types)
            .map(|(name, ty)| format!("{} — {}", name, ty))
            .collect()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} rows × {} columns, {} null cells",
            self.row_count, self.column_count, self.null_count
        )
    }

    /// Fixed-width text grid with a bold header
    pub fn render(&self) -> String {
        if self.headers.is_empty() {
            return format!("(no columns)\n{}\n", self.summary_line());
        }

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| display_width(cell))
                    .chain(std::iter::once(display_width(header)))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_CELL_WIDTH)
            })
            .collect();

        let mut out = String::new();
        let header_line = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w))
            .collect::<Vec<_>>()
            .join(" │ ");
        out.push_str(&header_line.bold().to_string());
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("─┼─"),
        );
        out.push('\n');

        for row in &self.rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| pad(cell, *w))
                .collect::<Vec<_>>()
                .join(" │ ");
            out.push_str(&line);
            out.push('\n');
        }

        if self.is_truncated() {
            out.push_str(&format!(
                "… showing {} of {} rows\n",
                self.rows.len(),
                self.row_count
            ));
        }
        out.push_str(&self.summary_line());
        out.push('\n');
        out
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate to `width` characters (with an ellipsis) and pad with spaces
fn pad(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len > width {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}
