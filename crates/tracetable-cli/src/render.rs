//! Plain-text trace table layout.

use std::io::{self, Write};
use tracetable_eval::TraceTable;

/// Cell text for a variable with no value in a row.
pub const MISSING: &str = "-";

const GAP: &str = "  ";

/// Left-aligned columns under a dashed rule, one line per frame.
pub fn render_table(table: &TraceTable) -> String {
    let columns = table.columns();
    if columns.is_empty() {
        return "(no variables written)\n".to_string();
    }

    let cells: Vec<Vec<String>> = table
        .rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.map_or_else(|| MISSING.to_string(), |v| v.to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, columns.iter().map(String::as_str), &widths);
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rules.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

pub fn write_table<W: Write>(out: &mut W, table: &TraceTable) -> io::Result<()> {
    out.write_all(render_table(table).as_bytes())
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}
