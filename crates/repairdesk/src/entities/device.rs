use repairdesk_macros::Record;
use repairdesk_query::Field;
use serde::{Deserialize, Serialize};

use super::{labeled_enum, Entity, Labeled};
use crate::auth::Role;
use crate::table::{Action, ColumnDef, DataTable};

labeled_enum! {
    pub enum DeviceType {
        Laptop => "laptop", "Laptop";
        Desktop => "desktop", "Desktop";
        Tablet => "tablet", "Tablet";
        Phone => "phone", "Phone";
    }
}

labeled_enum! {
    pub enum Condition {
        Excellent => "excellent", "Excellent";
        Good => "good", "Good";
        Fair => "fair", "Fair";
        Poor => "poor", "Poor";
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[field(Text, id)]
    pub id: String,
    #[field(Enum, rename = "type")]
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[field(Text)]
    pub brand: String,
    #[field(Text)]
    pub model: String,
    #[field(Text, rename = "serialNumber")]
    pub serial_number: String,
    #[field(Enum)]
    pub condition: Condition,
    #[field(Text)]
    pub client: String,
    #[field(Date, rename = "purchaseDate")]
    pub purchase_date: String,
    #[field(Date, rename = "warrantyUntil")]
    pub warranty_until: Option<String>,
}

impl Entity for Device {
    const REGISTRY: &'static str = "devices";
    const TITLE: &'static str = "Devices";

    fn seed() -> Vec<Self> {
        vec![
            Device {
                id: "1".into(),
                device_type: DeviceType::Laptop,
                brand: "Apple".into(),
                model: "MacBook Pro 2020".into(),
                serial_number: "C02XG0FDH7JY".into(),
                condition: Condition::Good,
                client: "Иванов И.И.".into(),
                purchase_date: "2020-03-15".into(),
                warranty_until: Some("2023-03-15".into()),
            },
            Device {
                id: "2".into(),
                device_type: DeviceType::Laptop,
                brand: "HP".into(),
                model: "Pavilion 15".into(),
                serial_number: "5CD9421PQR".into(),
                condition: Condition::Fair,
                client: "Петрова М.С.".into(),
                purchase_date: "2019-06-20".into(),
                warranty_until: Some("2022-06-20".into()),
            },
            Device {
                id: "3".into(),
                device_type: DeviceType::Desktop,
                brand: "Dell".into(),
                model: "OptiPlex 7080".into(),
                serial_number: "DELL7080XYZ".into(),
                condition: Condition::Excellent,
                client: "ООО \"ТехКомпани\"".into(),
                purchase_date: "2021-01-10".into(),
                warranty_until: Some("2024-01-10".into()),
            },
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(
                ColumnDef::new(Field::named(Device::TYPE), "Type")
                    .sortable()
                    .render_with(|v, _| DeviceType::render(v)),
            )
            .column(ColumnDef::new(Field::named(Device::BRAND), "Brand").sortable())
            .column(ColumnDef::new(Field::named(Device::MODEL), "Model").sortable())
            .column(ColumnDef::new(Field::named(Device::SERIAL_NUMBER), "Serial number"))
            .column(
                ColumnDef::new(Field::named(Device::CONDITION), "Condition")
                    .sortable()
                    .render_with(|v, _| Condition::render(v)),
            )
            .column(ColumnDef::new(Field::named(Device::CLIENT), "Owner").sortable())
            .column(
                ColumnDef::new(Field::named(Device::WARRANTY_UNTIL), "Warranty until")
                    .sortable()
                    .render_with(|v, _| {
                        if v.is_none() {
                            "none".to_string()
                        } else {
                            v.to_text().into_owned()
                        }
                    }),
            )
            .search_in(Field::named(Device::BRAND))
            .search_in(Field::named(Device::MODEL))
            .search_in(Field::named(Device::SERIAL_NUMBER))
            .search_in(Field::named(Device::CLIENT))
            .filter(Field::named(Device::TYPE), "Type", DeviceType::filter_options())
            .filter(Field::named(Device::CONDITION), "Condition", Condition::filter_options())
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin, Role::Manager]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }
}
