use repairdesk_export::Aggregation;
use repairdesk_macros::Record;
use repairdesk_query::Field;
use serde::{Deserialize, Serialize};

use super::{format_rubles, labeled_enum, Entity, Labeled};
use crate::auth::Role;
use crate::table::{Action, ColumnDef, DataTable};

labeled_enum! {
    pub enum PartCategory {
        Display => "display", "Displays";
        Storage => "storage", "Storage";
        Keyboard => "keyboard", "Keyboards";
        Battery => "battery", "Batteries";
        Ram => "ram", "Memory";
        Cooling => "cooling", "Cooling";
    }
}

/// A spare part in the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[field(Text, id)]
    pub id: String,
    #[field(Text)]
    pub name: String,
    #[field(Enum)]
    pub category: PartCategory,
    #[field(Text)]
    pub brand: String,
    #[field(Text, rename = "partNumber")]
    pub part_number: String,
    #[field(Number)]
    pub quantity: u32,
    #[field(Number, rename = "minQuantity")]
    pub min_quantity: u32,
    #[field(Number)]
    pub price: u64,
    #[field(Text)]
    pub supplier: String,
    #[field(Text)]
    pub location: String,
}

impl Part {
    /// At or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

impl Entity for Part {
    const REGISTRY: &'static str = "parts";
    const TITLE: &'static str = "Parts";

    fn seed() -> Vec<Self> {
        vec![
            Part {
                id: "1".into(),
                name: "Матрица 15.6\" FHD IPS".into(),
                category: PartCategory::Display,
                brand: "LG".into(),
                part_number: "LP156WF6-SPB1".into(),
                quantity: 12,
                min_quantity: 5,
                price: 4500,
                supplier: "ООО \"КомпТрейд\"".into(),
                location: "A-12-3".into(),
            },
            Part {
                id: "2".into(),
                name: "SSD 512GB NVMe".into(),
                category: PartCategory::Storage,
                brand: "Samsung".into(),
                part_number: "970 EVO Plus".into(),
                quantity: 25,
                min_quantity: 10,
                price: 5200,
                supplier: "ООО \"ТехноСнаб\"".into(),
                location: "B-05-1".into(),
            },
            Part {
                id: "3".into(),
                name: "Клавиатура для MacBook Pro".into(),
                category: PartCategory::Keyboard,
                brand: "Apple".into(),
                part_number: "A2141-KB-RU".into(),
                quantity: 3,
                min_quantity: 5,
                price: 8900,
                supplier: "ООО \"АплКомпоненты\"".into(),
                location: "C-08-2".into(),
            },
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(Part::NAME), "Name").sortable())
            .column(
                ColumnDef::new(Field::named(Part::CATEGORY), "Category")
                    .sortable()
                    .render_with(|v, _| PartCategory::render(v)),
            )
            .column(ColumnDef::new(Field::named(Part::BRAND), "Brand").sortable())
            .column(ColumnDef::new(Field::named(Part::PART_NUMBER), "Part number"))
            .column(
                ColumnDef::new(Field::named(Part::QUANTITY), "Stock")
                    .sortable()
                    .render_with(|v, part: &Part| {
                        if part.is_low_stock() {
                            format!("{} pcs (low)", v)
                        } else {
                            format!("{} pcs", v)
                        }
                    }),
            )
            .column(
                ColumnDef::new(Field::named(Part::PRICE), "Price")
                    .sortable()
                    .render_with(|v, _| format_rubles(v)),
            )
            .column(ColumnDef::new(Field::named(Part::SUPPLIER), "Supplier"))
            .column(ColumnDef::new(Field::named(Part::LOCATION), "Location"))
            .search_in(Field::named(Part::NAME))
            .search_in(Field::named(Part::BRAND))
            .search_in(Field::named(Part::PART_NUMBER))
            .search_in(Field::named(Part::SUPPLIER))
            .filter(Field::named(Part::CATEGORY), "Category", PartCategory::filter_options())
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin, Role::Manager]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }

    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        vec![
            (Part::QUANTITY, Aggregation::Sum),
            (Part::PRICE, Aggregation::Avg),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;

    #[test]
    fn stock_column_marks_low_stock() {
        let parts = Part::seed();
        let mut table = Part::table();
        let view = table.view(&parts, &Session::as_role(Role::Technician));

        let stock: Vec<&str> = view.rows.iter().map(|r| r.cells[4].as_str()).collect();
        assert_eq!(stock, ["12 pcs", "25 pcs", "3 pcs (low)"]);
        assert_eq!(view.actions, ["View"]);
    }
}
