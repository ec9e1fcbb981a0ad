//! Domain registries: clients, orders, repairs, devices, parts, services,
//! staff and the warehouse.
//!
//! Each entity derives [`Record`] and knows its seed data and the
//! [`DataTable`] that lists it.

use repairdesk_export::Aggregation;
use repairdesk_query::{Record, RecordEnum, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::table::{DataTable, FilterOption};

pub use client::{Client, ClientStatus, ClientType};
pub use device::{Condition, Device, DeviceType};
pub use order::{Order, OrderStatus, Priority};
pub use part::{Part, PartCategory};
pub use repair::{Repair, RepairStatus};
pub use service::{Service, ServiceCategory};
pub use staff::{Position, StaffMember, StaffStatus};
pub use warehouse::WarehouseItem;

/// A listable domain entity.
pub trait Entity:
    Record<Id = String> + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Registry name, e.g. `clients`.
    const REGISTRY: &'static str;
    /// Heading shown above the table and used as the report title.
    const TITLE: &'static str;

    /// Records the registry starts with.
    fn seed() -> Vec<Self>;

    /// The listing for this entity.
    fn table() -> DataTable<Self>;

    /// Report statistics offered by default.
    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        Vec::new()
    }
}

/// Enum fields with a human label for each key.
pub trait Labeled: RecordEnum + Copy + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.key() == key)
    }

    /// One filter option per variant.
    fn filter_options() -> Vec<FilterOption> {
        Self::ALL
            .iter()
            .map(|v| FilterOption::new(v.key(), v.label()))
            .collect()
    }

    /// Render transform showing the label of a stored key. Unknown keys
    /// show as they are.
    fn render(value: &Value<'_>) -> String {
        let key = value.to_text();
        match Self::from_key(&key) {
            Some(v) => v.label().to_string(),
            None => key.into_owned(),
        }
    }
}

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $key:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl repairdesk_query::RecordEnum for $name {
            fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl $crate::entities::Labeled for $name {
            const ALL: &'static [Self] = &[$($name::$variant,)+];

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }
    };
}

pub(crate) use labeled_enum;

mod client;
mod device;
mod order;
mod part;
mod repair;
mod service;
mod staff;
mod warehouse;

/// `₽45 000`, digits grouped by thousands. Non-numeric values show as
/// they are.
pub fn format_rubles(value: &Value<'_>) -> String {
    match value.as_number() {
        Some(n) => format!("₽{}", group_thousands(n.to_f64())),
        None => value.to_text().into_owned(),
    }
}

fn group_thousands(n: f64) -> String {
    let rounded = n.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
