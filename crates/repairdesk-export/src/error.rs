//! Error types for export, report and import.

use thiserror::Error;

/// Errors that can occur while exporting or rendering a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("select at least one column to export")]
    NoColumns,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    #[error("unknown aggregation: {0}")]
    UnknownAggregation(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("XML writing failed: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),

    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// Errors that can occur while parsing an import file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unknown import format: {0}")]
    UnknownFormat(String),

    #[error("JSON must contain an array of objects")]
    NotAnArray,

    #[error("JSON element {0} is not an object")]
    NotAnObject(usize),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("invalid CSV: {0}")]
    Csv(String),
}

/// Result alias for export and report operations.
pub type Result<T> = std::result::Result<T, ExportError>;
