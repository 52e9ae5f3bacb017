//! Output formatting utilities for CLI operations

use crate::error::GeneIdError;
use crate::store::StoreInfo;
use crate::translate::Translation;
use std::io::{self, Write};
use std::str::FromStr;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// JSON lines
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string; anything but `json` is text.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_geneid::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
    /// assert_eq!(OutputFormat::from_str("tsv").unwrap(), OutputFormat::Text);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Write one translated identifier.
///
/// Text output is `input -> output`, where a list is comma-joined and an
/// unconfigured miss prints as an empty string.
///
/// # Examples
///
/// ```
/// use ferro_geneid::cli::{output_translation, OutputFormat};
/// use ferro_geneid::Translation;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let value = Translation::One("MYC".to_string());
/// output_translation(&mut buffer, "4609", &value, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert_eq!(result, "4609 -> MYC\n");
/// ```
pub fn output_translation<W: Write>(
    writer: &mut W,
    input: &str,
    output: &Translation,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let record = serde_json::json!({
                "input": input,
                "output": output,
                "status": if output.is_missing() { "missing" } else { "ok" },
            });
            writeln!(writer, "{}", record)
        }
        OutputFormat::Text => writeln!(writer, "{} -> {}", input, output),
    }
}

/// Write store metadata.
pub fn output_info<W: Write>(writer: &mut W, info: &StoreInfo, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(info).map_err(io::Error::other)?;
            writeln!(writer, "{}", json)
        }
        OutputFormat::Text => {
            writeln!(writer, "version: {}", info.version)?;
            writeln!(writer, "date: {}", info.date)?;
            writeln!(writer, "dbs: {}", info.dbs.join(", "))?;
            writeln!(writer, "log:")?;
            for entry in &info.log {
                writeln!(writer, "  {}", entry)?;
            }
            Ok(())
        }
    }
}

/// Write an error.
///
/// # Examples
///
/// ```
/// use ferro_geneid::cli::{output_error, OutputFormat};
/// use ferro_geneid::GeneIdError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = GeneIdError::UnknownDatabase { name: "refseq".to_string() };
/// output_error(&mut buffer, &error, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.starts_with("ERROR [E1001]"));
/// ```
pub fn output_error<W: Write>(
    writer: &mut W,
    error: &GeneIdError,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let record = serde_json::json!({
                "code": error.code().as_str(),
                "error": error.to_string(),
                "status": "error",
            });
            writeln!(writer, "{}", record)
        }
        OutputFormat::Text => writeln!(writer, "ERROR {}", error.detailed_message()),
    }
}
