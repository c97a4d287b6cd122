// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal column-aligned table renderer for `flowctl status`: left-aligned
//! text columns, no color.

/// A column definition: header text and minimum width (defaults to the
/// header's own length, widened to fit the longest cell).
pub struct Column {
    pub header: &'static str,
}

/// A simple left-aligned table, rendered to a `String`.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Render with two-space column gaps, each column padded to the widest
    /// cell (including its header).
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.header.len()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let mut out = String::new();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{:<width$}", column.header, width = widths[i]));
        }
        out.push('\n');

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                out.push_str(&format!("{:<width$}", cell, width = widths[i]));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
