//! Import parsing.
//!
//! Files are parsed into [`ImportedRow`]s keyed by column key. The caller
//! decides how rows become records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ImportError;
use crate::projection::Column;
use crate::serialize::sanitize_xml_name;

/// Rows shown before an import is confirmed.
pub const PREVIEW_ROWS: usize = 5;

/// One parsed row: column key to text.
pub type ImportedRow = BTreeMap<String, String>;

/// Source format of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
    Xml,
}

impl ImportFormat {
    /// Guesses the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.parse().ok()
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportFormat::Csv => "csv",
            ImportFormat::Json => "json",
            ImportFormat::Xml => "xml",
        })
    }
}

impl FromStr for ImportFormat {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "json" => Ok(ImportFormat::Json),
            "xml" => Ok(ImportFormat::Xml),
            _ => Err(ImportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Parses `text` as `format`, mapping fields onto `columns`.
pub fn parse(
    format: ImportFormat,
    text: &str,
    columns: &[Column],
) -> Result<Vec<ImportedRow>, ImportError> {
    let rows = match format {
        ImportFormat::Csv => parse_csv(text, columns),
        ImportFormat::Json => parse_json(text),
        ImportFormat::Xml => parse_xml(text, columns),
    }?;
    debug!(%format, rows = rows.len(), "parsed import");
    Ok(rows)
}

/// The rows shown in an import preview.
pub fn preview(rows: &[ImportedRow]) -> &[ImportedRow] {
    &rows[..rows.len().min(PREVIEW_ROWS)]
}

/// CSV with a header row of column labels. Headers that match no label
/// are dropped; short rows fill with "".
pub fn parse_csv(text: &str, columns: &[Column]) -> Result<Vec<ImportedRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Csv(e.to_string()))?
        .clone();
    let mapping: Vec<Option<&str>> = headers
        .iter()
        .map(|header| {
            let key = columns
                .iter()
                .find(|c| c.label == header)
                .map(|c| c.key.as_str());
            if key.is_none() {
                warn!(header, "dropping unknown CSV column");
            }
            key
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::Csv(e.to_string()))?;
        let row: ImportedRow = mapping
            .iter()
            .enumerate()
            .filter_map(|(i, key)| {
                key.map(|k| (k.to_string(), record.get(i).unwrap_or("").to_string()))
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// JSON array of objects. All keys are kept; non-string values keep
/// their JSON text and `null` becomes "".
pub fn parse_json(text: &str) -> Result<Vec<ImportedRow>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, json_text(v)))
                .collect()),
            _ => Err(ImportError::NotAnObject(i)),
        })
        .collect()
}

fn json_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Deserialize)]
struct XmlDocument {
    #[serde(default)]
    record: Vec<BTreeMap<String, String>>,
}

/// `<record>` elements whose children are named after sanitized column
/// keys. Children that match no column are dropped.
pub fn parse_xml(text: &str, columns: &[Column]) -> Result<Vec<ImportedRow>, ImportError> {
    let document: XmlDocument = quick_xml::de::from_str(text)?;
    let names: Vec<(String, &str)> = columns
        .iter()
        .map(|c| (sanitize_xml_name(&c.key), c.key.as_str()))
        .collect();

    Ok(document
        .record
        .into_iter()
        .map(|mut element| {
            names
                .iter()
                .filter_map(|(name, key)| element.remove(name).map(|v| (key.to_string(), v)))
                .collect()
        })
        .collect())
}
