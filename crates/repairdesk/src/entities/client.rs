use repairdesk_export::Aggregation;
use repairdesk_macros::Record;
use repairdesk_query::Field;
use serde::{Deserialize, Serialize};

use super::{format_rubles, labeled_enum, Entity, Labeled};
use crate::auth::Role;
use crate::table::{Action, ColumnDef, DataTable};

labeled_enum! {
    pub enum ClientType {
        Individual => "individual", "Individual";
        Corporate => "corporate", "Corporate";
    }
}

labeled_enum! {
    pub enum ClientStatus {
        Active => "active", "Active";
        Vip => "vip", "VIP";
        Inactive => "inactive", "Inactive";
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[field(Text, id)]
    pub id: String,
    #[field(Text)]
    pub name: String,
    #[field(Text)]
    pub email: String,
    #[field(Text)]
    pub phone: String,
    #[field(Text)]
    pub address: String,
    #[field(Enum, rename = "type")]
    #[serde(rename = "type")]
    pub client_type: ClientType,
    #[field(Number, rename = "totalOrders")]
    pub total_orders: u32,
    #[field(Number, rename = "totalSpent")]
    pub total_spent: u64,
    #[field(Date, rename = "registeredAt")]
    pub registered_at: String,
    #[field(Enum)]
    pub status: ClientStatus,
}

impl Entity for Client {
    const REGISTRY: &'static str = "clients";
    const TITLE: &'static str = "Clients";

    fn seed() -> Vec<Self> {
        vec![
            Client {
                id: "1".into(),
                name: "Иванов Иван Иванович".into(),
                email: "ivanov@mail.ru".into(),
                phone: "+7 (999) 123-45-67".into(),
                address: "г. Москва, ул. Ленина, д. 10".into(),
                client_type: ClientType::Individual,
                total_orders: 5,
                total_spent: 45000,
                registered_at: "2023-05-15".into(),
                status: ClientStatus::Active,
            },
            Client {
                id: "2".into(),
                name: "Петрова Мария Сергеевна".into(),
                email: "petrova@gmail.com".into(),
                phone: "+7 (999) 234-56-78".into(),
                address: "г. Санкт-Петербург, пр. Невский, д. 25".into(),
                client_type: ClientType::Individual,
                total_orders: 2,
                total_spent: 12000,
                registered_at: "2023-08-20".into(),
                status: ClientStatus::Active,
            },
            Client {
                id: "3".into(),
                name: "ООО \"ТехКомпани\"".into(),
                email: "info@techcompany.ru".into(),
                phone: "+7 (495) 123-45-67".into(),
                address: "г. Москва, ул. Тверская, д. 5".into(),
                client_type: ClientType::Corporate,
                total_orders: 15,
                total_spent: 250000,
                registered_at: "2023-01-10".into(),
                status: ClientStatus::Vip,
            },
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(Client::NAME), "Name").sortable())
            .column(ColumnDef::new(Field::named(Client::EMAIL), "Email").sortable())
            .column(ColumnDef::new(Field::named(Client::PHONE), "Phone").sortable())
            .column(
                ColumnDef::new(Field::named(Client::TYPE), "Type")
                    .sortable()
                    .render_with(|v, _| ClientType::render(v)),
            )
            .column(
                ColumnDef::new(Field::named(Client::STATUS), "Status")
                    .sortable()
                    .render_with(|v, _| ClientStatus::render(v)),
            )
            .column(ColumnDef::new(Field::named(Client::TOTAL_ORDERS), "Orders").sortable())
            .column(
                ColumnDef::new(Field::named(Client::TOTAL_SPENT), "Spent")
                    .sortable()
                    .render_with(|v, _| format_rubles(v)),
            )
            .search_in(Field::named(Client::NAME))
            .search_in(Field::named(Client::EMAIL))
            .search_in(Field::named(Client::PHONE))
            .filter(Field::named(Client::TYPE), "Type", ClientType::filter_options())
            .filter(Field::named(Client::STATUS), "Status", ClientStatus::filter_options())
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin, Role::Manager]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }

    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        vec![(Client::TOTAL_SPENT, Aggregation::Sum)]
    }
}
