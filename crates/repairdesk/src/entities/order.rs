use repairdesk_export::Aggregation;
use repairdesk_macros::Record;
use repairdesk_query::Field;
use serde::{Deserialize, Serialize};

use super::{format_rubles, labeled_enum, Entity, Labeled};
use crate::auth::Role;
use crate::table::{Action, ColumnDef, DataTable};

labeled_enum! {
    /// Where a repair order is in the workshop.
    pub enum OrderStatus {
        New => "new", "New";
        Diagnostics => "diagnostics", "Diagnostics";
        InProgress => "in_progress", "In progress";
        WaitingParts => "waiting_parts", "Waiting for parts";
        Completed => "completed", "Completed";
        Cancelled => "cancelled", "Cancelled";
    }
}

labeled_enum! {
    pub enum Priority {
        Low => "low", "Low";
        Medium => "medium", "Medium";
        High => "high", "High";
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[field(Text, id)]
    pub id: String,
    #[field(Text)]
    pub number: String,
    #[field(Text)]
    pub client: String,
    #[field(Text)]
    pub device: String,
    #[field(Text)]
    pub issue: String,
    #[field(Enum)]
    pub status: OrderStatus,
    #[field(Enum)]
    pub priority: Priority,
    #[field(Text)]
    pub technician: String,
    #[field(Date, rename = "createdAt")]
    pub created_at: String,
    #[field(Number)]
    pub cost: u64,
}

impl Entity for Order {
    const REGISTRY: &'static str = "orders";
    const TITLE: &'static str = "Orders";

    fn seed() -> Vec<Self> {
        vec![
            Order {
                id: "1".into(),
                number: "#1024".into(),
                client: "Иванов Иван Иванович".into(),
                device: "MacBook Pro 2020".into(),
                issue: "Не включается, требуется диагностика".into(),
                status: OrderStatus::InProgress,
                priority: Priority::High,
                technician: "Смирнов П.А.".into(),
                created_at: "2024-01-10".into(),
                cost: 15000,
            },
            Order {
                id: "2".into(),
                number: "#1023".into(),
                client: "Петрова Мария Сергеевна".into(),
                device: "HP Pavilion".into(),
                issue: "Перегревается, требуется чистка".into(),
                status: OrderStatus::Diagnostics,
                priority: Priority::Medium,
                technician: "Кузнецов В.И.".into(),
                created_at: "2024-01-09".into(),
                cost: 3000,
            },
            Order {
                id: "3".into(),
                number: "#1022".into(),
                client: "Сидоров Андрей Владимирович".into(),
                device: "Lenovo ThinkPad".into(),
                issue: "Разбит экран".into(),
                status: OrderStatus::WaitingParts,
                priority: Priority::Low,
                technician: "Смирнов П.А.".into(),
                created_at: "2024-01-08".into(),
                cost: 8000,
            },
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(Order::NUMBER), "Number").sortable())
            .column(ColumnDef::new(Field::named(Order::CLIENT), "Client").sortable())
            .column(ColumnDef::new(Field::named(Order::DEVICE), "Device"))
            .column(
                ColumnDef::new(Field::named(Order::STATUS), "Status")
                    .sortable()
                    .render_with(|v, _| OrderStatus::render(v)),
            )
            .column(
                ColumnDef::new(Field::named(Order::PRIORITY), "Priority")
                    .sortable()
                    .render_with(|v, _| Priority::render(v)),
            )
            .column(ColumnDef::new(Field::named(Order::TECHNICIAN), "Technician"))
            .column(
                ColumnDef::new(Field::named(Order::COST), "Cost")
                    .sortable()
                    .render_with(|v, _| format_rubles(v)),
            )
            .column(ColumnDef::new(Field::named(Order::CREATED_AT), "Created").sortable())
            .search_in(Field::named(Order::NUMBER))
            .search_in(Field::named(Order::CLIENT))
            .search_in(Field::named(Order::DEVICE))
            .filter(Field::named(Order::STATUS), "Status", OrderStatus::filter_options())
            .filter(Field::named(Order::PRIORITY), "Priority", Priority::filter_options())
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin, Role::Manager]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }

    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        vec![(Order::COST, Aggregation::Sum)]
    }
}
