//! Proc macros for RepairDesk.
//!
//! ## Derive Macros
//!
//! - [`Record`] - Implement `repairdesk_query::Record` for a domain struct

mod attrs;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `repairdesk_query::Record` for a struct with named fields.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text` | Text field, exposed as `Value::Text` |
/// | `Number` | Numeric field, exposed as `Value::Number` |
/// | `Bool` | Boolean field |
/// | `Enum` | Enum field, exposed through its `RecordEnum::key` |
/// | `Date` | ISO-8601 date string, compared as text |
/// | `id` | The record identifier (exactly one field) |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom name for queries |
///
/// `Option<_>` fields produce `Value::None` when empty. Fields without a
/// kind are not queryable.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Client::NAME`, `Client::TOTAL_SPENT`)
/// 2. An implementation of `Record` with `Id` set to the id field's type
///
/// # Example
///
/// ```ignore
/// use repairdesk_macros::Record;
/// use repairdesk_query::{Field, QueryState, TableQuery};
///
/// #[derive(Record)]
/// struct Part {
///     #[field(Text, id)]
///     id: String,
///
///     #[field(Text)]
///     name: String,
///
///     #[field(Number)]
///     stock: u32,
///
///     #[field(skip)]
///     notes: String,
/// }
///
/// let table = TableQuery::new()
///     .search_in(Field::<Part>::named(Part::NAME))
///     .sort_on(Field::named(Part::STOCK));
/// ```
#[proc_macro_derive(Record, attributes(field))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
