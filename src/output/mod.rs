//! Rendering tables for humans and for files.

use crate::table::{Cell, Table};
use crate::utils::error::OutputError;
use log::info;
use std::fs;
use std::path::Path;

/// Widest a text-mode cell gets before it is cut
const MAX_CELL_WIDTH: usize = 48;

/// Table as a JSON array of records
pub fn to_json(table: &Table, pretty: bool) -> Result<String, OutputError> {
    let json = if pretty {
        serde_json::to_string_pretty(table)?
    } else {
        serde_json::to_string(table)?
    };
    Ok(json)
}

/// Write a table as pretty JSON records
pub fn write_json(table: &Table, path: &Path) -> Result<(), OutputError> {
    let json = to_json(table, true)?;
    fs::write(path, json)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Aligned plain-text rendering; long cells are truncated with `...`
pub fn render_text(table: &Table) -> String {
    let headers: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{} <{}>", c.name, c.column_type))
        .collect();

    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|cells| cells.iter().map(render_cell).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&format!("# {} row(s)\n", table.len()));
    out
}

fn render_cell(cell: &Cell) -> String {
    let text = cell.to_string();
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text;
    }
    let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", cut)
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
