// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned text tables.

use std::io::Write;

use crate::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Plain,
    Muted,
    /// Colored by run-state
    Status,
}

#[derive(Debug, Clone)]
pub struct Column {
    header: &'static str,
    align: Align,
    paint: Paint,
    max: Option<usize>,
}

impl Column {
    fn new(header: &'static str, align: Align, paint: Paint) -> Self {
        Self { header, align, paint, max: None }
    }

    pub fn left(header: &'static str) -> Self {
        Self::new(header, Align::Left, Paint::Plain)
    }

    pub fn right(header: &'static str) -> Self {
        Self::new(header, Align::Right, Paint::Plain)
    }

    pub fn muted(header: &'static str) -> Self {
        Self::new(header, Align::Left, Paint::Muted)
    }

    pub fn status(header: &'static str) -> Self {
        Self::new(header, Align::Left, Paint::Status)
    }

    /// Truncate cells longer than `max` characters.
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max.max(1));
        self
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Add a row; missing cells render empty, extra cells are ignored.
    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self, out: &mut dyn Write) {
        let _ = out.write_all(self.to_text().as_bytes());
    }

    pub fn to_text(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, col)| clip(row.get(i).map(String::as_str).unwrap_or(""), col.max))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                rows.iter().map(|r| r[i].chars().count()).fold(col.header.len(), usize::max)
            })
            .collect();

        let mut text = String::new();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        self.push_line(&mut text, &headers, &widths, true);
        for row in &rows {
            self.push_line(&mut text, row, &widths, false);
        }
        text
    }

    fn push_line(&self, text: &mut String, cells: &[String], widths: &[usize], is_header: bool) {
        let last = self.columns.len().saturating_sub(1);
        let mut line = String::new();
        for (i, (col, cell)) in self.columns.iter().zip(cells).enumerate() {
            let pad = " ".repeat(widths[i].saturating_sub(cell.chars().count()));
            let painted = if is_header {
                color::header(cell)
            } else {
                match col.paint {
                    Paint::Plain => cell.clone(),
                    Paint::Muted => color::muted(cell),
                    Paint::Status => color::status(cell),
                }
            };
            match col.align {
                Align::Left if i == last => line.push_str(&painted),
                Align::Left => {
                    line.push_str(&painted);
                    line.push_str(&pad);
                }
                Align::Right => {
                    line.push_str(&pad);
                    line.push_str(&painted);
                }
            }
            if i != last {
                line.push_str("  ");
            }
        }
        text.push_str(line.trim_end());
        text.push('\n');
    }
}

fn clip(cell: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if cell.chars().count() > max => {
            let mut clipped: String = cell.chars().take(max - 1).collect();
            clipped.push('…');
            clipped
        }
        _ => cell.to_string(),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
