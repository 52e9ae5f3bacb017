//! CLI utilities for ferro-geneid
//!
//! Pure helpers used by the `ferro-geneid` binary, kept in the library so
//! they can be unit tested without spawning the CLI.

pub mod format;

pub use format::{output_error, output_info, output_translation, OutputFormat};

use std::io::BufRead;

const UTF8_BOM: char = '\u{feff}';

/// Drop a leading UTF-8 byte order mark.
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// The identifier on an input line, if any. `#` starts a comment.
pub fn id_from_line(line: &str, is_first_line: bool) -> Option<&str> {
    let line = if is_first_line { strip_bom(line.trim_start()) } else { line };
    let id = line.split_once('#').map_or(line, |(id, _)| id).trim();
    (!id.is_empty()).then_some(id)
}

/// Read identifiers, one per line, skipping blanks and comments.
pub fn read_ids<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut ids = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(id) = id_from_line(&line, idx == 0) {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}
