use repairdesk_export::Aggregation;
use repairdesk_macros::Record;
use repairdesk_query::{Field, Value};
use serde::{Deserialize, Serialize};

use super::{format_rubles, labeled_enum, Entity, Labeled};
use crate::auth::Role;
use crate::table::{Action, ColumnDef, DataTable, FilterOption};

labeled_enum! {
    pub enum ServiceCategory {
        Diagnostics => "diagnostics", "Diagnostics";
        Repair => "repair", "Repair";
        Software => "software", "Software";
        Maintenance => "maintenance", "Maintenance";
        Upgrade => "upgrade", "Upgrade";
    }
}

/// An entry of the price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[field(Text, id)]
    pub id: String,
    #[field(Text)]
    pub name: String,
    #[field(Enum)]
    pub category: ServiceCategory,
    #[field(Number)]
    pub price: u64,
    /// Minutes.
    #[field(Number)]
    pub duration: u32,
    #[field(Text)]
    pub description: String,
    #[field(Bool, rename = "isActive")]
    pub is_active: bool,
}

fn active_label(value: &Value<'_>) -> String {
    match value {
        Value::Bool(true) => "Active".to_string(),
        Value::Bool(false) => "Inactive".to_string(),
        other => other.to_text().into_owned(),
    }
}

impl Entity for Service {
    const REGISTRY: &'static str = "services";
    const TITLE: &'static str = "Services";

    fn seed() -> Vec<Self> {
        let service = |id: &str, name: &str, category, price, duration, description: &str| Service {
            id: id.into(),
            name: name.into(),
            category,
            price,
            duration,
            description: description.into(),
            is_active: true,
        };
        vec![
            service(
                "1",
                "Диагностика компьютера",
                ServiceCategory::Diagnostics,
                500,
                30,
                "Полная диагностика состояния компьютера",
            ),
            service(
                "2",
                "Замена матрицы ноутбука",
                ServiceCategory::Repair,
                8000,
                120,
                "Замена разбитого экрана на ноутбуке",
            ),
            service(
                "3",
                "Установка Windows",
                ServiceCategory::Software,
                1500,
                60,
                "Установка операционной системы Windows 10/11",
            ),
            service(
                "4",
                "Чистка от пыли",
                ServiceCategory::Maintenance,
                1000,
                45,
                "Чистка внутренних компонентов от пыли",
            ),
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(Service::NAME), "Name").sortable())
            .column(
                ColumnDef::new(Field::named(Service::CATEGORY), "Category")
                    .sortable()
                    .render_with(|v, _| ServiceCategory::render(v)),
            )
            .column(
                ColumnDef::new(Field::named(Service::PRICE), "Price")
                    .sortable()
                    .render_with(|v, _| format_rubles(v)),
            )
            .column(
                ColumnDef::new(Field::named(Service::DURATION), "Duration")
                    .sortable()
                    .render_with(|v, _| format!("{} min", v)),
            )
            .column(
                ColumnDef::new(Field::named(Service::IS_ACTIVE), "Status")
                    .sortable()
                    .render_with(|v, _| active_label(v)),
            )
            .search_in(Field::named(Service::NAME))
            .search_in(Field::named(Service::DESCRIPTION))
            .filter(
                Field::named(Service::CATEGORY),
                "Category",
                ServiceCategory::filter_options(),
            )
            .filter(
                Field::named(Service::IS_ACTIVE),
                "Status",
                vec![
                    FilterOption::new("true", "Active"),
                    FilterOption::new("false", "Inactive"),
                ],
            )
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin, Role::Manager]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }

    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        vec![(Service::PRICE, Aggregation::Avg)]
    }
}
