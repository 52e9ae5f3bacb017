//! Error types for ferro-geneid
//!
//! Only configuration problems are errors: unknown databases, unreadable or
//! malformed source files, missing columns and inconsistent custom databases.
//! An identifier that is simply absent from a table is a lookup miss and is
//! resolved to the missing-value default instead.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Store errors (E1xxx)
    /// Database/table not registered in the store
    UnknownDatabase = 1001,
    /// Database name collides with a built-in table
    ReservedName = 1002,

    // Source file errors (E2xxx)
    /// Required column missing from a source header
    MissingColumn = 2001,
    /// Source file could not be parsed
    MalformedInput = 2002,

    // Consistency errors (E3xxx)
    /// Symbol does not resolve through the official-symbol table
    UnknownSymbol = 3001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration file error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnknownDatabase => "unknown database",
            ErrorCode::ReservedName => "reserved database name",
            ErrorCode::MissingColumn => "missing required column",
            ErrorCode::MalformedInput => "malformed source file",
            ErrorCode::UnknownSymbol => "symbol not in official-symbol table",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-geneid operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneIdError {
    /// A lookup addressed a database that is not in the store
    #[error("Unknown database: {name}")]
    UnknownDatabase { name: String },

    /// `add_db` was asked to overwrite a built-in table
    #[error("Database name is reserved: {name}")]
    ReservedName { name: String },

    /// A required column is absent from a source file header
    #[error("Missing column '{column}' in {path}")]
    MissingColumn {
        column: String,
        path: String,
        /// Closest header name, if any
        suggestion: Option<String>,
    },

    /// A source file could not be parsed
    #[error("Malformed input in {path} at line {line}: {msg}")]
    MalformedInput {
        path: String,
        line: usize,
        msg: String,
    },

    /// A custom database row names a symbol the store does not know
    #[error("Unknown symbol '{symbol}' at line {line}")]
    UnknownSymbol { symbol: String, line: usize },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON (de)serialization error
    #[error("JSON error: {msg}")]
    Json { msg: String },

    /// Configuration file error
    #[error("Config error: {msg}")]
    Config { msg: String },
}

impl GeneIdError {
    /// Create a missing-column error, suggesting the closest available header
    pub fn missing_column(column: &str, path: impl Into<String>, available: &[String]) -> Self {
        GeneIdError::MissingColumn {
            column: column.to_string(),
            path: path.into(),
            suggestion: suggest_column(column, available),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            GeneIdError::UnknownDatabase { .. } => ErrorCode::UnknownDatabase,
            GeneIdError::ReservedName { .. } => ErrorCode::ReservedName,
            GeneIdError::MissingColumn { .. } => ErrorCode::MissingColumn,
            GeneIdError::MalformedInput { .. } => ErrorCode::MalformedInput,
            GeneIdError::UnknownSymbol { .. } => ErrorCode::UnknownSymbol,
            GeneIdError::Io { .. } => ErrorCode::IoError,
            GeneIdError::Json { .. } => ErrorCode::JsonError,
            GeneIdError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get a formatted error with code prefix and suggestion, if any
    pub fn detailed_message(&self) -> String {
        let mut result = format!("[{}] {}", self.code(), self);
        if let GeneIdError::MissingColumn {
            suggestion: Some(s),
            ..
        } = self
        {
            result.push_str("\n\nDid you mean: ");
            result.push_str(s);
        }
        result
    }
}

/// Suggest a header name close to `found`.
///
/// Matches case-insensitively first, then on a shared prefix of at least
/// four characters (e.g. `ensembl_id` against `ensembl_gene_id`).
pub fn suggest_column(found: &str, available: &[String]) -> Option<String> {
    let found_lower = found.to_lowercase();
    if let Some(hit) = available.iter().find(|a| a.to_lowercase() == found_lower) {
        return Some(hit.clone());
    }

    available
        .iter()
        .map(|a| {
            let shared = a
                .to_lowercase()
                .chars()
                .zip(found_lower.chars())
                .take_while(|(x, y)| x == y)
                .count();
            (shared, a)
        })
        .filter(|(shared, _)| *shared >= 4)
        .max_by_key(|(shared, _)| *shared)
        .map(|(_, a)| a.clone())
}

impl From<std::io::Error> for GeneIdError {
    fn from(err: std::io::Error) -> Self {
        GeneIdError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GeneIdError {
    fn from(err: serde_json::Error) -> Self {
        GeneIdError::Json {
            msg: err.to_string(),
        }
    }
}
