//! Typed field accessors.
//!
//! A [`Field`] pairs a field name with a function extracting that field's
//! [`Value`] from a record. Search, filter and sort descriptors all carry a
//! `Field`, so the engine never looks fields up by untyped name.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::record::Record;
use crate::value::Value;

type Getter<T> = dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync;

/// Named accessor for one field of `T`.
///
/// ```
/// use repairdesk_query::{Field, Value};
///
/// struct Order {
///     number: String,
///     total: u32,
/// }
///
/// let number = Field::new("number", |o: &Order| Value::text(&o.number));
/// let total = Field::new("total", |o: &Order| Value::from(o.total));
///
/// let order = Order { number: "A-17".into(), total: 3500 };
/// assert_eq!(number.get(&order), Value::text("A-17"));
/// assert_eq!(total.get(&order).to_text(), "3500");
/// ```
pub struct Field<T> {
    name: Cow<'static, str>,
    getter: Option<Arc<Getter<T>>>,
}

impl<T> Field<T> {
    /// Creates a field from a name and an accessor function.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, getter: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        Field {
            name: name.into(),
            getter: Some(Arc::new(getter)),
        }
    }

    /// A field no record has. It reads as [`Value::None`] everywhere.
    pub fn absent(name: impl Into<Cow<'static, str>>) -> Self {
        Field {
            name: name.into(),
            getter: None,
        }
    }

    /// The field name, as used in query state and descriptors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extracts this field's value from a record.
    pub fn get<'a>(&self, record: &'a T) -> Value<'a> {
        match &self.getter {
            Some(getter) => getter(record),
            None => Value::None,
        }
    }
}

impl<T: Record + 'static> Field<T> {
    /// Creates a field that reads through [`Record::field`].
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        let key = name.clone();
        Field::new(name, move |record: &T| record.field(&key))
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Field {
            name: self.name.clone(),
            getter: self.getter.clone(),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}
