use repairdesk_macros::Record;
use repairdesk_query::Field;
use serde::{Deserialize, Serialize};

use super::{labeled_enum, Entity, Labeled};
use crate::table::{Action, ColumnDef, DataTable};

labeled_enum! {
    /// Bench status of a repair job.
    pub enum RepairStatus {
        Diagnostics => "diagnostics", "Diagnostics";
        InProgress => "in_progress", "In progress";
        WaitingParts => "waiting_parts", "Waiting for parts";
        Testing => "testing", "Testing";
        Completed => "completed", "Completed";
    }
}

/// Work on the bench for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Repair {
    #[field(Text, id)]
    pub id: String,
    #[field(Text, rename = "orderId")]
    pub order_id: String,
    #[field(Text)]
    pub device: String,
    #[field(Text)]
    pub issue: String,
    #[field(Text)]
    pub technician: String,
    #[field(Enum)]
    pub status: RepairStatus,
    #[field(Date, rename = "startDate")]
    pub start_date: String,
    #[field(Date, rename = "estimatedCompletion")]
    pub estimated_completion: String,
}

impl Entity for Repair {
    const REGISTRY: &'static str = "repairs";
    const TITLE: &'static str = "Repairs";

    fn seed() -> Vec<Self> {
        vec![
            Repair {
                id: "1".into(),
                order_id: "#1024".into(),
                device: "MacBook Pro 2020".into(),
                issue: "Замена матрицы".into(),
                technician: "Смирнов П.А.".into(),
                status: RepairStatus::InProgress,
                start_date: "2024-01-10".into(),
                estimated_completion: "2024-01-12".into(),
            },
            Repair {
                id: "2".into(),
                order_id: "#1023".into(),
                device: "HP Pavilion".into(),
                issue: "Чистка от пыли".into(),
                technician: "Кузнецов В.И.".into(),
                status: RepairStatus::Diagnostics,
                start_date: "2024-01-09".into(),
                estimated_completion: "2024-01-10".into(),
            },
            Repair {
                id: "3".into(),
                order_id: "#1022".into(),
                device: "Lenovo ThinkPad".into(),
                issue: "Замена клавиатуры".into(),
                technician: "Смирнов П.А.".into(),
                status: RepairStatus::WaitingParts,
                start_date: "2024-01-08".into(),
                estimated_completion: "2024-01-14".into(),
            },
        ]
    }

    fn table() -> DataTable<Self> {
        DataTable::for_records()
            .column(ColumnDef::new(Field::named(Repair::ORDER_ID), "Order").sortable())
            .column(ColumnDef::new(Field::named(Repair::DEVICE), "Device").sortable())
            .column(ColumnDef::new(Field::named(Repair::ISSUE), "Issue").sortable())
            .column(ColumnDef::new(Field::named(Repair::TECHNICIAN), "Technician").sortable())
            .column(
                ColumnDef::new(Field::named(Repair::STATUS), "Status")
                    .sortable()
                    .render_with(|v, _| RepairStatus::render(v)),
            )
            .column(ColumnDef::new(Field::named(Repair::START_DATE), "Started").sortable())
            .column(
                ColumnDef::new(Field::named(Repair::ESTIMATED_COMPLETION), "Due").sortable(),
            )
            .search_in(Field::named(Repair::ORDER_ID))
            .search_in(Field::named(Repair::DEVICE))
            .search_in(Field::named(Repair::TECHNICIAN))
            .filter(Field::named(Repair::STATUS), "Status", RepairStatus::filter_options())
            .action(Action::new("View"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, Session};

    #[test]
    fn search_covers_order_device_and_technician() {
        let repairs = Repair::seed();
        let mut table = Repair::table();
        let session = Session::as_role(Role::Admin);

        table.type_search("#1023");
        assert_eq!(table.view(&repairs, &session).rows[0].id, "2");
        table.type_search("смирнов");
        assert_eq!(table.view(&repairs, &session).rows.len(), 2);
        table.type_search("клавиатуры");
        assert!(table.view(&repairs, &session).rows.is_empty());
    }

    #[test]
    fn status_shows_its_label() {
        let repairs = Repair::seed();
        let mut table = Repair::table();
        table.select_filter(Repair::STATUS, "waiting_parts");

        let view = table.view(&repairs, &Session::as_role(Role::Technician));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells[4], "Waiting for parts");
        assert_eq!(view.filters[0].options.len(), 5);
        assert_eq!(view.actions, ["View"]);
    }
}
