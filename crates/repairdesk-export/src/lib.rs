//! Export, report and import for RepairDesk tables.
//!
//! Records are first reduced to a [`Projection`] (selected columns with
//! typed cells). The projection then feeds:
//!
//! - [`serialize`]: CSV, JSON, XML, SpreadsheetML and printable HTML
//! - [`Report`]: an HTML page with period, comments and column statistics
//!
//! Import goes the other way: [`import::parse`] turns CSV, JSON or XML
//! text into [`ImportedRow`]s keyed by column key.
//!
//! ```rust
//! use repairdesk_export::{serialize, ExportColumn, ExportFormat, Projection};
//! use repairdesk_query::{Field, Value};
//!
//! struct Part {
//!     name: &'static str,
//!     stock: u32,
//! }
//!
//! let parts = [Part { name: "Screen", stock: 4 }, Part { name: "Battery", stock: 0 }];
//! let columns = [
//!     ExportColumn::new(Field::new("name", |p: &Part| Value::text(p.name)), "Name"),
//!     ExportColumn::new(Field::new("stock", |p: &Part| Value::from(p.stock)), "Stock"),
//! ];
//!
//! let projection = Projection::new(&parts, &columns).unwrap();
//! let csv = serialize(ExportFormat::Csv, &projection).unwrap();
//! assert_eq!(csv, "Name,Stock\nScreen,4\nBattery,0\n");
//! ```

mod error;
mod format;
pub mod import;
mod projection;
mod report;
mod serialize;
mod templates;

pub use error::{ExportError, ImportError, Result};
pub use format::ExportFormat;
pub use import::{ImportFormat, ImportedRow, PREVIEW_ROWS};
pub use projection::{Cell, Column, ExportColumn, Projection};
pub use report::{Aggregation, Period, Report, ReportFormat, Statistic, DEFAULT_COMPANY};
pub use serialize::{
    sanitize_xml_name, serialize, to_csv, to_html, to_json, to_spreadsheet, to_xml,
};
