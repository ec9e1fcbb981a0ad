//! Export formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row of labels.
    Csv,
    /// Pretty-printed array of objects keyed by label.
    Json,
    /// `<data><record>...</record></data>` document.
    Xml,
    /// SpreadsheetML 2003 workbook, opens in Excel.
    Spreadsheet,
    /// Printable standalone HTML table.
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Xml,
        ExportFormat::Spreadsheet,
        ExportFormat::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Spreadsheet => "spreadsheet",
            ExportFormat::Html => "html",
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Spreadsheet => "xls",
            ExportFormat::Html => "html",
        }
    }

    /// `<name>.<extension>`
    pub fn file_name(self, name: &str) -> String {
        format!("{}.{}", name, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xml" => Ok(ExportFormat::Xml),
            "spreadsheet" | "excel" | "xls" => Ok(ExportFormat::Spreadsheet),
            "html" | "pdf" | "print" => Ok(ExportFormat::Html),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Spreadsheet);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("yaml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(ExportFormat::Spreadsheet.file_name("clients"), "clients.xls");
        assert_eq!(ExportFormat::Json.file_name("orders"), "orders.json");
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }
}
