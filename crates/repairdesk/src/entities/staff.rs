use repairdesk_export::Aggregation;
use repairdesk_macros::Record;
use repairdesk_query::Field;
use serde::{Deserialize, Serialize};

use super::{format_rubles, labeled_enum, Entity, Labeled};
use crate::auth::Role;
use crate::table::{Action, ColumnDef, DataTable};

labeled_enum! {
    pub enum Position {
        Technician => "technician", "Technician";
        Manager => "manager", "Manager";
        Admin => "admin", "Administrator";
    }
}

labeled_enum! {
    pub enum StaffStatus {
        Active => "active", "Active";
        Vacation => "vacation", "On vacation";
        Fired => "fired", "Dismissed";
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[field(Text, id)]
    pub id: String,
    #[field(Text)]
    pub name: String,
    #[field(Enum)]
    pub position: Position,
    #[field(Text)]
    pub email: String,
    #[field(Text)]
    pub phone: String,
    #[field(Text)]
    pub specialization: String,
    /// Years.
    #[field(Number)]
    pub experience: u32,
    #[field(Number)]
    pub salary: u64,
    #[field(Date, rename = "hireDate")]
    pub hire_date: String,
    #[field(Enum)]
    pub status: StaffStatus,
}

impl Entity for StaffMember {
    const REGISTRY: &'static str = "staff";
    const TITLE: &'static str = "Staff";

    fn seed() -> Vec<Self> {
        vec![
            StaffMember {
                id: "1".into(),
                name: "Смирнов Петр Александрович".into(),
                position: Position::Technician,
                email: "smirnov@techrepair.ru".into(),
                phone: "+7 (999) 111-22-33".into(),
                specialization: "Apple".into(),
                experience: 5,
                salary: 80000,
                hire_date: "2019-03-15".into(),
                status: StaffStatus::Active,
            },
            StaffMember {
                id: "2".into(),
                name: "Кузнецов Владимир Игоревич".into(),
                position: Position::Technician,
                email: "kuznetsov@techrepair.ru".into(),
                phone: "+7 (999) 222-33-44".into(),
                specialization: "Windows/Linux".into(),
                experience: 3,
                salary: 65000,
                hire_date: "2021-06-20".into(),
                status: StaffStatus::Active,
            },
            StaffMember {
                id: "3".into(),
                name: "Иванова Анна Сергеевна".into(),
                position: Position::Manager,
                email: "ivanova@techrepair.ru".into(),
                phone: "+7 (999) 333-44-55".into(),
                specialization: "Управление".into(),
                experience: 7,
                salary: 95000,
                hire_date: "2017-01-10".into(),
                status: StaffStatus::Active,
            },
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(StaffMember::NAME), "Name").sortable())
            .column(
                ColumnDef::new(Field::named(StaffMember::POSITION), "Position")
                    .sortable()
                    .render_with(|v, _| Position::render(v)),
            )
            .column(ColumnDef::new(Field::named(StaffMember::EMAIL), "Email"))
            .column(ColumnDef::new(Field::named(StaffMember::PHONE), "Phone"))
            .column(ColumnDef::new(Field::named(StaffMember::SPECIALIZATION), "Specialization"))
            .column(
                ColumnDef::new(Field::named(StaffMember::EXPERIENCE), "Experience")
                    .sortable()
                    .render_with(|v, _| format!("{} yrs", v)),
            )
            .column(
                ColumnDef::new(Field::named(StaffMember::SALARY), "Salary")
                    .sortable()
                    .render_with(|v, _| format_rubles(v)),
            )
            .column(
                ColumnDef::new(Field::named(StaffMember::STATUS), "Status")
                    .render_with(|v, _| StaffStatus::render(v)),
            )
            .search_in(Field::named(StaffMember::NAME))
            .search_in(Field::named(StaffMember::EMAIL))
            .search_in(Field::named(StaffMember::PHONE))
            .search_in(Field::named(StaffMember::SPECIALIZATION))
            .filter(Field::named(StaffMember::POSITION), "Position", Position::filter_options())
            .filter(Field::named(StaffMember::STATUS), "Status", StaffStatus::filter_options())
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }

    fn aggregations() -> Vec<(&'static str, Aggregation)> {
        vec![
            (StaffMember::SALARY, Aggregation::Sum),
            (StaffMember::SALARY, Aggregation::Avg),
        ]
    }
}
