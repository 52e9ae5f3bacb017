//! Tab-delimited source reader.
//!
//! Reads a whole table into memory; the builder needs two passes over the
//! reference file (canonical symbols first, then records). Missing trailing
//! cells read as empty strings, never as a separate null marker.

use crate::cli::strip_bom;
use crate::error::GeneIdError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One data row with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsvRow {
    pub line: usize,
    cells: Vec<String>,
}

impl TsvRow {
    /// Cell at `idx`, or `""` if the row is short.
    pub fn get(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// A parsed tab-delimited file.
#[derive(Debug, Clone)]
pub struct TsvTable {
    /// Source name used in error messages
    pub source: String,
    /// Column names (empty when read without a header)
    pub header: Vec<String>,
    /// Data rows
    pub rows: Vec<TsvRow>,
}

impl TsvTable {
    /// Read a file from disk.
    pub fn read<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Self, GeneIdError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GeneIdError::Io {
            msg: format!("Failed to open {}: {}", path.display(), e),
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string(), has_header)
    }

    /// Read from any reader.
    ///
    /// Fields may be double-quoted; a quoted field keeps embedded tabs.
    pub fn from_reader<R: Read>(
        reader: R,
        source: &str,
        has_header: bool,
    ) -> Result<Self, GeneIdError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut header: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for record in csv_reader.records() {
            let record = record.map_err(|e| GeneIdError::MalformedInput {
                path: source.to_string(),
                line: e.position().map(|p| p.line() as usize).unwrap_or(0),
                msg: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            if header.is_none() && rows.is_empty() {
                if let Some(first) = cells.first_mut() {
                    *first = strip_bom(first).to_string();
                }
            }
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }

            if has_header && header.is_none() {
                header = Some(cells.iter().map(|c| c.trim().to_string()).collect());
                continue;
            }

            if let Some(h) = &header {
                if cells.len() > h.len() {
                    return Err(GeneIdError::MalformedInput {
                        path: source.to_string(),
                        line,
                        msg: format!("expected {} fields, found {}", h.len(), cells.len()),
                    });
                }
            }

            rows.push(TsvRow { line, cells });
        }

        if has_header && header.is_none() {
            return Err(GeneIdError::MalformedInput {
                path: source.to_string(),
                line: 0,
                msg: "empty file, expected a header line".to_string(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            header: header.unwrap_or_default(),
            rows,
        })
    }

    /// Index of a named column.
    pub fn column(&self, name: &str) -> Result<usize, GeneIdError> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| GeneIdError::missing_column(name, self.source.clone(), &self.header))
    }
}

/// Split a multi-valued cell; an empty cell yields no values.
pub fn split_cell(cell: &str, sep: char) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(sep).map(str::to_string).collect()
}
