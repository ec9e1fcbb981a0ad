//! The query pipeline and the table-level query definition.
//!
//! Every run applies the same fixed sequence:
//!
//! ```text
//! search -> filter -> sort -> paginate
//! ```
//!
//! Search and filter never reorder. Sort is stable, so rows comparing equal
//! keep their order in either direction. The input slice is only borrowed.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::clause::{FilterClause, SearchClause};
use crate::field::Field;
use crate::ordering::{compare_values, is_mixed, Dir};
use crate::page::{Page, PageRequest};
use crate::record::Record;
use crate::state::QueryState;
use crate::value::Value;

/// Runs the pipeline over `records` and cuts out one page.
///
/// `total_count` counts rows after search and filters; `page_count` is
/// never less than 1. Requesting a page past the end returns no rows.
///
/// ```
/// use repairdesk_query::{query, Dir, Field, FilterClause, PageRequest, SearchClause, Value};
///
/// struct Client { name: &'static str, status: &'static str }
///
/// let name = Field::new("name", |c: &Client| Value::text(c.name));
/// let status = Field::new("status", |c: &Client| Value::text(c.status));
///
/// let clients = [
///     Client { name: "Ivanov", status: "active" },
///     Client { name: "Petrov", status: "vip" },
///     Client { name: "Sidorov", status: "active" },
/// ];
///
/// let page = query(
///     &clients,
///     &SearchClause::new("", vec![]),
///     &[FilterClause::new(status, "active")],
///     Some((&name, Dir::Desc)),
///     PageRequest::first(10),
/// );
/// let names: Vec<_> = page.items.iter().map(|c| c.name).collect();
/// assert_eq!(names, ["Sidorov", "Ivanov"]);
/// assert_eq!(page.total_count, 2);
/// ```
pub fn query<'a, T>(
    records: &'a [T],
    search: &SearchClause<T>,
    filters: &[FilterClause<T>],
    sort: Option<(&Field<T>, Dir)>,
    page: PageRequest,
) -> Page<'a, T> {
    let ordered = select(records, search, filters, sort);
    let page = Page::slice(&ordered, page);
    debug!(
        input = records.len(),
        matched = page.total_count,
        page = page.page,
        page_size = page.page_size,
        returned = page.len(),
        "query executed"
    );
    page
}

/// Search, filter and sort without paginating.
fn select<'a, T>(
    records: &'a [T],
    search: &SearchClause<T>,
    filters: &[FilterClause<T>],
    sort: Option<(&Field<T>, Dir)>,
) -> Vec<&'a T> {
    let matched: Vec<&'a T> = records
        .iter()
        .filter(|record| search.matches(record))
        .filter(|record| filters.iter().all(|f| f.matches(record)))
        .collect();

    match sort {
        Some((field, dir)) => sort_stable(matched, field, dir),
        None => matched,
    }
}

fn sort_stable<'a, T>(rows: Vec<&'a T>, field: &Field<T>, dir: Dir) -> Vec<&'a T> {
    let mixed = Cell::new(false);
    let mut keyed: Vec<(Value<'a>, &'a T)> = rows.into_iter().map(|r| (field.get(r), r)).collect();

    // slice::sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| {
        if !mixed.get() && is_mixed(a, b) {
            mixed.set(true);
        }
        dir.apply(compare_values(a, b))
    });

    if mixed.get() {
        warn!(
            field = field.name(),
            "sort field holds values of different kinds; ordering by kind rank"
        );
    }

    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Query definition for one table: which fields can be searched, filtered
/// and sorted.
///
/// The definition is built once per table. Each run resolves the field
/// names in a [`QueryState`] against it.
///
/// ```
/// use repairdesk_query::{Field, QueryState, SortKey, TableQuery, Value};
///
/// struct Part { name: &'static str, stock: u32 }
///
/// let table = TableQuery::new()
///     .search_in(Field::new("name", |p: &Part| Value::text(p.name)))
///     .sort_on(Field::new("stock", |p: &Part| Value::from(p.stock)));
///
/// let parts = [
///     Part { name: "Screen", stock: 4 },
///     Part { name: "Battery", stock: 12 },
///     Part { name: "Screen glue", stock: 0 },
/// ];
///
/// let state = QueryState::new()
///     .with_search("screen")
///     .with_sort(SortKey::asc("stock"));
///
/// let page = table.run(&parts, &state);
/// let names: Vec<_> = page.items.iter().map(|p| p.name).collect();
/// assert_eq!(names, ["Screen glue", "Screen"]);
/// ```
pub struct TableQuery<T> {
    search_fields: Vec<Field<T>>,
    filter_fields: Vec<Field<T>>,
    sort_fields: Vec<Field<T>>,
    lookup: Option<Lookup<T>>,
}

type Lookup<T> = Arc<dyn Fn(&str) -> Field<T> + Send + Sync>;

impl<T> Default for TableQuery<T> {
    fn default() -> Self {
        TableQuery {
            search_fields: Vec::new(),
            filter_fields: Vec::new(),
            sort_fields: Vec::new(),
            lookup: None,
        }
    }
}

impl<T> Clone for TableQuery<T> {
    fn clone(&self) -> Self {
        TableQuery {
            search_fields: self.search_fields.clone(),
            filter_fields: self.filter_fields.clone(),
            sort_fields: self.sort_fields.clone(),
            lookup: self.lookup.clone(),
        }
    }
}

impl<T> fmt::Debug for TableQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableQuery")
            .field("search_fields", &self.search_fields)
            .field("filter_fields", &self.filter_fields)
            .field("sort_fields", &self.sort_fields)
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}

impl<T: Record + 'static> TableQuery<T> {
    /// Resolves names the table does not declare through [`Record::field`]
    /// instead of treating them as absent.
    pub fn with_record_lookup(mut self) -> Self {
        self.lookup = Some(Arc::new(|name: &str| Field::named(name.to_string())));
        self
    }
}

impl<T> TableQuery<T> {
    /// Creates an empty definition. With no fields declared, only
    /// pagination has an effect.
    pub fn new() -> Self {
        TableQuery::default()
    }

    /// Adds a field to the free-text search, in order.
    pub fn search_in(mut self, field: Field<T>) -> Self {
        self.search_fields.push(field);
        self
    }

    /// Declares a field that filters can select on.
    pub fn filter_on(mut self, field: Field<T>) -> Self {
        self.filter_fields.push(field);
        self
    }

    /// Declares a sortable field.
    pub fn sort_on(mut self, field: Field<T>) -> Self {
        self.sort_fields.push(field);
        self
    }

    /// Narrows the search to the named fields, in the given order.
    /// Names that are not search fields are looked up like any other
    /// undeclared field.
    pub fn search_only<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        let fields: Vec<Field<T>> = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                match self.search_fields.iter().find(|f| f.name() == name) {
                    Some(field) => field.clone(),
                    None => self.lookup(name),
                }
            })
            .collect();
        self.search_fields = fields;
        self
    }

    /// Search fields in declaration order.
    pub fn search_fields(&self) -> &[Field<T>] {
        &self.search_fields
    }

    /// Looks up a declared field by name: filter fields first, then sort
    /// fields, then search fields.
    pub fn field(&self, name: &str) -> Option<&Field<T>> {
        self.filter_fields
            .iter()
            .chain(&self.sort_fields)
            .chain(&self.search_fields)
            .find(|f| f.name() == name)
    }

    /// Runs the pipeline for `state` and returns the requested page.
    pub fn run<'a>(&self, records: &'a [T], state: &QueryState) -> Page<'a, T> {
        let (search, filters, sort) = self.resolve(state);
        query(
            records,
            &search,
            &filters,
            sort.as_ref().map(|(field, dir)| (field, *dir)),
            PageRequest::new(state.effective_page(), state.effective_page_size()),
        )
    }

    /// Every row matching `state`, ordered, without pagination.
    pub fn select<'a>(&self, records: &'a [T], state: &QueryState) -> Vec<&'a T> {
        let (search, filters, sort) = self.resolve(state);
        select(
            records,
            &search,
            &filters,
            sort.as_ref().map(|(field, dir)| (field, *dir)),
        )
    }

    /// Number of rows matching `state`'s search and filters.
    pub fn count(&self, records: &[T], state: &QueryState) -> usize {
        let (search, filters, _) = self.resolve(state);
        records
            .iter()
            .filter(|r| search.matches(r) && filters.iter().all(|f| f.matches(r)))
            .count()
    }

    /// A declared field, or the lookup's answer for an undeclared name.
    /// Without a lookup, undeclared fields read as absent.
    fn lookup(&self, name: &str) -> Field<T> {
        if let Some(field) = self.field(name) {
            return field.clone();
        }
        match &self.lookup {
            Some(lookup) => {
                debug!(field = name, "resolving undeclared field by name");
                lookup(name)
            }
            None => {
                warn!(field = name, "undeclared field reads as empty");
                Field::absent(name.to_string())
            }
        }
    }

    fn resolve(
        &self,
        state: &QueryState,
    ) -> (SearchClause<T>, Vec<FilterClause<T>>, Option<(Field<T>, Dir)>) {
        let search = SearchClause::new(&state.search_term, self.search_fields.clone());

        let filters = state
            .active_filters()
            .map(|(name, value)| FilterClause::new(self.lookup(name), value))
            .collect();

        let sort = state
            .sort
            .as_ref()
            .map(|key| (self.lookup(&key.field), key.dir));

        (search, filters, sort)
    }
}
