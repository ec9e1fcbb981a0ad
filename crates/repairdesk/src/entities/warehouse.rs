use repairdesk_export::Aggregation;
use repairdesk_macros::Record;
use repairdesk_query::{Field, RecordEnum};
use serde::{Deserialize, Serialize};

use super::{Entity, Labeled, PartCategory};
use crate::table::{Action, ColumnDef, DataTable, FilterOption};

/// A stock position on a warehouse shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseItem {
    #[field(Text, id)]
    pub id: String,
    #[field(Text)]
    pub name: String,
    #[field(Enum)]
    pub category: PartCategory,
    #[field(Number)]
    pub quantity: u32,
    #[field(Number, rename = "minQuantity")]
    pub min_quantity: u32,
    #[field(Text)]
    pub location: String,
    #[field(Date, rename = "lastUpdated")]
    pub last_updated: String,
}

impl WarehouseItem {
    /// At or below the minimum kept on the shelf.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

/// Categories the warehouse stocks.
const SHELVED: [PartCategory; 4] = [
    PartCategory::Display,
    PartCategory::Storage,
    PartCategory::Keyboard,
    PartCategory::Ram,
];

impl Entity for WarehouseItem {
    const REGISTRY: &'static str = "warehouse";
    const TITLE: &'static str = "Warehouse";

    fn seed() -> Vec<Self> {
        let item = |id: &str, name: &str, category, quantity, min_quantity, location: &str, day| {
            WarehouseItem {
                id: id.into(),
                name: name.into(),
                category,
                quantity,
                min_quantity,
                location: location.into(),
                last_updated: format!("2024-01-{:02}", day),
            }
        };
        vec![
            item("1", "Матрица 15.6\" FHD", PartCategory::Display, 12, 5, "A-12-3", 10),
            item("2", "SSD 512GB", PartCategory::Storage, 25, 10, "B-05-1", 9),
            item("3", "Клавиатура MacBook", PartCategory::Keyboard, 3, 5, "C-08-2", 8),
            item("4", "RAM 8GB DDR4", PartCategory::Ram, 45, 15, "B-03-4", 10),
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(WarehouseItem::NAME), "Name").sortable())
            .column(ColumnDef::new(Field::named(WarehouseItem::LOCATION), "Location").sortable())
            .column(
                ColumnDef::new(Field::named(WarehouseItem::QUANTITY), "Stock")
                    .sortable()
                    .render_with(|v, item: &WarehouseItem| {
                        if item.is_low_stock() {
                            format!("{} pcs (low)", v)
                        } else {
                            format!("{} pcs", v)
                        }
                    }),
            )
            .column(ColumnDef::new(Field::named(WarehouseItem::MIN_QUANTITY), "Minimum").sortable())
            .column(ColumnDef::new(Field::named(WarehouseItem::LAST_UPDATED), "Updated").sortable())
            .search_in(Field::named(WarehouseItem::NAME))
            .search_in(Field::named(WarehouseItem::LOCATION))
            .filter(
                Field::named(WarehouseItem::CATEGORY),
                "Category",
                SHELVED
                    .iter()
                    .map(|c| FilterOption::new(c.key(), c.label()))
                    .collect(),
            )
            .action(Action::new("View"))
    }

    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        vec![(WarehouseItem::QUANTITY, Aggregation::Sum)]
    }
}
