// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::core::sanitize::clean_cell;

/* ---------------- Parsing ---------------- */

/// Split on `\n` or `\r\n`, dropping lines that are blank after trimming.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Quote-aware comma split of a single line.
///
/// A `"` toggles quoted mode and is not kept; commas inside quotes are
/// literal. No `""` escape: two quotes simply toggle twice. Every cell is
/// trimmed and stripped of one pair of surrounding quotes.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut field = s!();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(clean_cell(&take(&mut field))),
            _ => field.push(ch),
        }
    }
    // Trailing field, even with an unterminated quote.
    cells.push(clean_cell(&field));
    cells
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, ",")?; } else { first = false; }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Headers + rows as one CSV string.
pub fn rows_to_string(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut buf: Vec<u8> = Vec::new();

    // Writing into a Vec cannot fail.
    let _ = write_row(&mut buf, headers);
    for r in rows {
        let _ = write_row(&mut buf, r);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
