//! RepairDesk query engine: search, filter, sort and paginate in-memory
//! record collections.
//!
//! Every listing in RepairDesk (clients, orders, devices, parts, staff)
//! goes through the same engine. Given records and a [`QueryState`], it
//! deterministically derives the visible page and its metadata.
//!
//! # Quick Start
//!
//! ```rust
//! use repairdesk_query::{Field, QueryState, SortKey, TableQuery, Value};
//!
//! struct Client {
//!     name: String,
//!     status: &'static str,
//! }
//!
//! let table = TableQuery::new()
//!     .search_in(Field::new("name", |c: &Client| Value::text(&c.name)))
//!     .filter_on(Field::new("status", |c: &Client| Value::text(c.status)))
//!     .sort_on(Field::new("name", |c: &Client| Value::text(&c.name)));
//!
//! let clients = vec![
//!     Client { name: "Ivanov".into(), status: "active" },
//!     Client { name: "Petrov".into(), status: "vip" },
//!     Client { name: "Sidorov".into(), status: "active" },
//! ];
//!
//! let state = QueryState::new()
//!     .with_filter("status", "active")
//!     .with_sort(SortKey::desc("name"));
//!
//! let page = table.run(&clients, &state);
//! assert_eq!(page.total_count, 2);
//! assert_eq!(page.items[0].name, "Sidorov");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! search -> filter -> sort -> paginate
//! ```
//!
//! - **Search**: a record passes when any search field's text contains the
//!   term, ignoring case. Empty term or no search fields: everything passes.
//! - **Filter**: each selected value must equal the field's text exactly.
//!   Filters combine with AND; an empty selection means "All".
//! - **Sort**: stable, single key, natural ordering per value kind.
//! - **Paginate**: `page_count = max(1, ceil(total / page_size))`; pages
//!   past the end are empty, never an error.
//!
//! The engine has no side effects. Records are owned elsewhere, typically
//! in a [`Collection`].

mod clause;
mod collection;
mod error;
mod field;
mod ordering;
mod page;
mod query;
mod record;
mod state;
mod value;

pub use clause::{FilterClause, SearchClause};
pub use collection::Collection;
pub use error::{QueryError, Result};
pub use field::Field;
pub use ordering::{compare_values, is_mixed, toggle_sort, Dir, SortKey};
pub use page::{page_count, Page, PageRequest};
pub use query::{query, TableQuery};
pub use record::{Record, RecordEnum};
pub use state::{parse_filter, QueryState, DEFAULT_PAGE_SIZE};
pub use value::{Number, Value, ValueKind};
