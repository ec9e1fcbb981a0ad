//! # RepairDesk
//!
//! Admin tables for a device repair shop. Each registry (clients, orders,
//! repairs, devices, parts, services, staff, warehouse) is listed through a
//! [`DataTable`]: a search box, filter selectors, sortable headers and a
//! pager over the query engine in [`repairdesk_query`]. Rows can be
//! exported, summarized in a report or imported through
//! [`repairdesk_export`], and added, edited or deleted through a
//! [`Collection`](repairdesk_query::Collection).
//!
//! ```rust
//! use repairdesk::{Client, Entity, Role, Session};
//!
//! let clients = Client::seed();
//! let mut table = Client::table();
//! table.type_search("ivanov");
//!
//! let view = table.view(&clients, &Session::as_role(Role::Manager));
//! assert_eq!(view.rows.len(), 1);
//! assert_eq!(view.rows[0].cells[0], "Иванов Иван Иванович");
//! assert_eq!(view.actions, ["View", "Edit"]);
//! ```

pub mod auth;
pub mod cli;
pub mod dynamic;
pub mod entities;
pub mod render;
pub mod settings;
pub mod table;

pub use auth::{Role, Session, UnknownRole, User};
pub use dynamic::{DynamicError, JsonRecord};
pub use entities::{
    format_rubles, Client, ClientStatus, ClientType, Condition, Device, DeviceType, Entity,
    Labeled, Order, OrderStatus, Part, PartCategory, Position, Priority, Repair, RepairStatus,
    Service, ServiceCategory, StaffMember, StaffStatus, WarehouseItem,
};
pub use settings::{Settings, SettingsError};
pub use table::{
    Action, ColumnDef, DataTable, FilterDef, FilterOption, FilterView, HeaderView, RowView,
    SortIndicator, TableView,
};
