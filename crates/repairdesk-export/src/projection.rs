//! Column selection applied to records.
//!
//! Every exporter and the report work on a [`Projection`]: the selected
//! columns evaluated once per record into typed [`Cell`]s. Numbers stay
//! numbers, so formats that distinguish them (JSON, spreadsheet) can.

use std::borrow::Cow;

use repairdesk_query::{Field, Number, Value};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// A column as seen by exporters and importers: machine key plus the
/// human label used for headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// A column bound to the accessor that produces its values.
pub struct ExportColumn<T> {
    field: Field<T>,
    label: String,
}

impl<T> ExportColumn<T> {
    /// The column key is the field's name.
    pub fn new(field: Field<T>, label: impl Into<String>) -> Self {
        ExportColumn {
            field,
            label: label.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.field.name()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn column(&self) -> Column {
        Column::new(self.key(), self.label.clone())
    }
}

impl<T> Clone for ExportColumn<T> {
    fn clone(&self) -> Self {
        ExportColumn {
            field: self.field.clone(),
            label: self.label.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ExportColumn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportColumn")
            .field("key", &self.key())
            .field("label", &self.label)
            .finish()
    }
}

/// One evaluated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Cell {
    /// Display text. Empty cells render as "".
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// A number a spreadsheet can hold: not NaN, not infinite.
    pub fn is_finite_number(&self) -> bool {
        matches!(self, Cell::Number(n) if n.to_f64().is_finite())
    }

    /// Numeric reading used by aggregations. Anything that does not read
    /// as a finite number counts as 0.
    pub fn coerce_number(&self) -> f64 {
        let n = match self {
            Cell::Empty => 0.0,
            Cell::Number(n) => n.to_f64(),
            Cell::Bool(b) => f64::from(u8::from(*b)),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
        };
        if n.is_nan() {
            0.0
        } else {
            n
        }
    }

    /// JSON value. Non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Empty => serde_json::Value::Null,
            Cell::Text(s) => serde_json::Value::String(s.clone()),
            Cell::Bool(b) => serde_json::Value::Bool(*b),
            Cell::Number(Number::I64(n)) => serde_json::Value::from(*n),
            Cell::Number(Number::U64(n)) => serde_json::Value::from(*n),
            Cell::Number(Number::F64(n)) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl From<Value<'_>> for Cell {
    fn from(value: Value<'_>) -> Self {
        match value {
            Value::None => Cell::Empty,
            Value::Text(s) => Cell::Text(s.into_owned()),
            Value::Number(n) => Cell::Number(n),
            Value::Bool(b) => Cell::Bool(b),
        }
    }
}

/// Selected columns evaluated over a sequence of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    title: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Projection {
    /// Evaluates `columns` over `records` in order.
    ///
    /// Fails with [`ExportError::NoColumns`] when no column is selected.
    pub fn new<'a, T: 'a>(
        records: impl IntoIterator<Item = &'a T>,
        columns: &[ExportColumn<T>],
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(ExportError::NoColumns);
        }
        let rows = records
            .into_iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| Cell::from(col.field.get(record)))
                    .collect()
            })
            .collect();
        Ok(Projection {
            title: String::from("export"),
            columns: columns.iter().map(ExportColumn::column).collect(),
            rows,
        })
    }

    /// Builds a projection from already evaluated rows. Each row must have
    /// one cell per column.
    pub fn from_rows(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ExportError::NoColumns);
        }
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(columns.len(), Cell::Empty);
                row
            })
            .collect();
        Ok(Projection {
            title: String::from("export"),
            columns,
            rows,
        })
    }

    /// Sets the document title used by the HTML format and file names.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with `key`.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// All cells of one column, top to bottom.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}
