//! Traits implemented by queryable records.
//!
//! [`Record`] is usually derived with `#[derive(Record)]` from the
//! `repairdesk-macros` crate, but can also be implemented by hand.

use std::fmt;

use crate::value::Value;

/// A row of domain data keyed by a unique identifier.
///
/// # Manual Implementation
///
/// ```
/// use repairdesk_query::{Number, Record, Value};
///
/// struct Part {
///     id: u32,
///     name: String,
///     stock: u32,
/// }
///
/// impl Record for Part {
///     type Id = u32;
///
///     fn id(&self) -> &u32 {
///         &self.id
///     }
///
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "id" => Value::from(self.id),
///             "name" => Value::text(&self.name),
///             "stock" => Value::Number(Number::from(self.stock)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Type of the unique identifier, used as the stable row key.
    type Id: PartialEq + Clone + fmt::Debug;

    /// Returns the record's identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the value of a field, or [`Value::None`] if the record has
    /// no such field.
    fn field(&self, name: &str) -> Value<'_>;
}

/// Enums stored in record fields expose a stable key.
///
/// The key is the field's textual representation, so it is what filter
/// options select on (`"active"`, `"vip"`, ...).
///
/// ```
/// use repairdesk_query::RecordEnum;
///
/// #[derive(Clone, Copy)]
/// enum ClientStatus {
///     Active,
///     Vip,
/// }
///
/// impl RecordEnum for ClientStatus {
///     fn key(&self) -> &'static str {
///         match self {
///             ClientStatus::Active => "active",
///             ClientStatus::Vip => "vip",
///         }
///     }
/// }
///
/// assert_eq!(ClientStatus::Vip.key(), "vip");
/// ```
pub trait RecordEnum {
    /// Returns the key for this variant.
    fn key(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    struct Device {
        id: String,
        model: String,
        year: u16,
    }

    impl Record for Device {
        type Id = String;

        fn id(&self) -> &String {
            &self.id
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "model" => Value::text(&self.model),
                "year" => Value::Number(Number::from(self.year)),
                _ => Value::None,
            }
        }
    }

    fn device() -> Device {
        Device {
            id: "d1".to_string(),
            model: "iPhone 13".to_string(),
            year: 2021,
        }
    }

    #[test]
    fn manual_impl() {
        let d = device();
        assert_eq!(d.id(), "d1");
        assert_eq!(d.field("model"), Value::text("iPhone 13"));
        assert_eq!(d.field("year"), Value::Number(Number::U64(2021)));
        assert_eq!(d.field("unknown"), Value::None);
    }
}
