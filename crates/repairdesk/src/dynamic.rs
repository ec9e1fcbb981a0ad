//! Records read from arbitrary JSON.
//!
//! A [`JsonRecord`] wraps one JSON object so files with no Rust type
//! behind them can be listed, searched and exported by field name.

use std::collections::BTreeSet;

use repairdesk_export::ImportedRow;
use repairdesk_query::{Field, Number, Record, Value};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::table::{Action, ColumnDef, DataTable};

#[derive(Debug, Error)]
pub enum DynamicError {
    #[error("expected a JSON array of objects")]
    NotAnArray,

    #[error("element {0} is not a JSON object")]
    NotAnObject(usize),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A JSON object keyed by its `id` member.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    id: String,
    fields: Map<String, Json>,
}

impl JsonRecord {
    /// Wraps `fields`. Without an `id` member the record is identified by
    /// `fallback_id`.
    pub fn new(fields: Map<String, Json>, fallback_id: impl Into<String>) -> Self {
        let id = match fields.get("id") {
            Some(Json::String(s)) => s.clone(),
            Some(Json::Number(n)) => n.to_string(),
            _ => fallback_id.into(),
        };
        JsonRecord { id, fields }
    }

    /// An imported row with the given id. The id is stored as a field too.
    pub fn from_row(id: impl Into<String>, row: ImportedRow) -> Self {
        let id = id.into();
        let mut fields: Map<String, Json> = row
            .into_iter()
            .map(|(k, v)| (k, Json::String(v)))
            .collect();
        fields.insert("id".to_string(), Json::String(id.clone()));
        JsonRecord { id, fields }
    }

    /// Parses a JSON array of objects. Elements without an `id` get their
    /// one-based position.
    pub fn parse_array(text: &str) -> Result<Vec<JsonRecord>, DynamicError> {
        let json: Json = serde_json::from_str(text)?;
        let Json::Array(items) = json else {
            return Err(DynamicError::NotAnArray);
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::Object(fields) => Ok(JsonRecord::new(fields, (i + 1).to_string())),
                _ => Err(DynamicError::NotAnObject(i)),
            })
            .collect()
    }

    /// Field names across `records`, in first-seen order.
    pub fn keys(records: &[JsonRecord]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut keys = Vec::new();
        for record in records {
            for key in record.fields.keys() {
                if seen.insert(key.as_str()) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// A listing over every field of `records`: all columns sortable and
    /// searchable, every field filterable by exact value.
    pub fn table(records: &[JsonRecord]) -> DataTable<JsonRecord> {
        let mut table = DataTable::for_records();
        for key in JsonRecord::keys(records) {
            table = table
                .column(ColumnDef::new(Field::named(key.clone()), key.clone()).sortable())
                .search_in(Field::named(key.clone()))
                .filter(Field::named(key.clone()), key, Vec::new());
        }
        table.action(Action::new("View"))
    }
}

impl Record for JsonRecord {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Value<'_> {
        match self.fields.get(name) {
            None | Some(Json::Null) => Value::None,
            Some(Json::Bool(b)) => Value::Bool(*b),
            Some(Json::Number(n)) => json_number(n),
            Some(Json::String(s)) => Value::text(s),
            // Nested structures compare by their JSON text.
            Some(other) => Value::owned(other.to_string()),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Value<'static> {
    let number = if let Some(i) = n.as_i64() {
        Number::I64(i)
    } else if let Some(u) = n.as_u64() {
        Number::U64(u)
    } else {
        Number::F64(n.as_f64().unwrap_or(f64::NAN))
    };
    Value::Number(number)
}

impl Serialize for JsonRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
