//! The `DataTable` view model.
//!
//! A [`DataTable`] owns what one listing screen needs: column definitions,
//! filter selectors, row actions and the [`QueryState`]. User input
//! (typing in the search box, picking a filter, clicking a header, paging)
//! goes through its methods. [`DataTable::view`] derives everything the
//! screen shows from the records and the session.

use std::fmt;
use std::sync::Arc;

use repairdesk_export::ExportColumn;
use repairdesk_query::{
    page_count, Field, Page, PageRequest, QueryState, Record, TableQuery, Value,
};
use tracing::debug;

use crate::auth::{Role, Session};

type RenderFn<T> = Arc<dyn Fn(&Value<'_>, &T) -> String + Send + Sync>;

/// A displayed column.
pub struct ColumnDef<T> {
    field: Field<T>,
    label: String,
    sortable: bool,
    render: Option<RenderFn<T>>,
}

impl<T> ColumnDef<T> {
    pub fn new(field: Field<T>, label: impl Into<String>) -> Self {
        ColumnDef {
            field,
            label: label.into(),
            sortable: false,
            render: None,
        }
    }

    /// Makes the header clickable for sorting.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Formats cell values for display. The transform also sees the
    /// whole record. Sorting and filtering still see the raw value.
    pub fn render_with<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value<'_>, &T) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn key(&self) -> &str {
        self.field.name()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn field(&self) -> &Field<T> {
        &self.field
    }

    /// Display text of this column for `record`.
    pub fn display(&self, record: &T) -> String {
        let value = self.field.get(record);
        match &self.render {
            Some(render) => render(&value, record),
            None => value.to_text().into_owned(),
        }
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        ColumnDef {
            field: self.field.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key())
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .finish()
    }
}

/// One choice in a filter selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A filter selector. The empty selection means "All".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDef {
    pub key: String,
    pub label: String,
    pub options: Vec<FilterOption>,
}

/// A row action, optionally restricted to some roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub permission: Option<Vec<Role>>,
}

impl Action {
    /// An action everyone sees.
    pub fn new(label: impl Into<String>) -> Self {
        Action {
            label: label.into(),
            permission: None,
        }
    }

    /// Restricts the action to `roles`.
    pub fn require(mut self, roles: &[Role]) -> Self {
        self.permission = Some(roles.to_vec());
        self
    }

    pub fn is_visible_to(&self, session: &Session) -> bool {
        match &self.permission {
            None => true,
            Some(roles) => session.has_permission(roles),
        }
    }
}

/// Header sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Ascending,
    Descending,
    Unsorted,
}

impl SortIndicator {
    pub fn symbol(self) -> &'static str {
        match self {
            SortIndicator::Ascending => "↑",
            SortIndicator::Descending => "↓",
            SortIndicator::Unsorted => "↕",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    /// `None` for columns that cannot be sorted.
    pub sort: Option<SortIndicator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub key: String,
    pub label: String,
    pub selected: Option<String>,
    pub options: Vec<FilterOption>,
}

/// Everything a listing screen shows.
#[derive(Debug)]
pub struct TableView<'a, T> {
    pub page: Page<'a, T>,
    pub search_term: String,
    pub search_enabled: bool,
    pub filters: Vec<FilterView>,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    /// Labels of the actions the session may use.
    pub actions: Vec<String>,
}

impl<T> TableView<'_, T> {
    /// "Showing 11-20 of 23", present when there is more than one page.
    pub fn summary(&self) -> Option<String> {
        if self.page.page_count <= 1 {
            return None;
        }
        let (first, last) = self.page.range()?;
        Some(format!(
            "Showing {}-{} of {}",
            first, last, self.page.total_count
        ))
    }

    /// "2 / 3"
    pub fn pager(&self) -> String {
        format!("{} / {}", self.page.page, self.page.page_count)
    }
}

/// A listing: columns, filters, actions and the state they act on.
pub struct DataTable<T> {
    columns: Vec<ColumnDef<T>>,
    filters: Vec<FilterDef>,
    actions: Vec<Action>,
    query: TableQuery<T>,
    state: QueryState,
    page_count: usize,
}

impl<T> Default for DataTable<T> {
    fn default() -> Self {
        DataTable {
            columns: Vec::new(),
            filters: Vec::new(),
            actions: Vec::new(),
            query: TableQuery::new(),
            state: QueryState::new(),
            page_count: 1,
        }
    }
}

impl<T: Record + 'static> DataTable<T> {
    /// A table whose filters, sorts and search fields may also name
    /// fields it does not declare. Those read through [`Record::field`].
    pub fn for_records() -> Self {
        DataTable {
            query: TableQuery::new().with_record_lookup(),
            ..DataTable::default()
        }
    }
}

impl<T> DataTable<T> {
    pub fn new() -> Self {
        DataTable::default()
    }

    /// Adds a displayed column. Sortable columns become sort fields.
    pub fn column(mut self, column: ColumnDef<T>) -> Self {
        if column.sortable {
            self.query = self.query.sort_on(column.field.clone());
        }
        self.columns.push(column);
        self
    }

    /// Adds a field to the search box. Without search fields the box is
    /// hidden and typing has no effect.
    pub fn search_in(mut self, field: Field<T>) -> Self {
        self.query = self.query.search_in(field);
        self
    }

    /// Adds a filter selector over `field`.
    pub fn filter(
        mut self,
        field: Field<T>,
        label: impl Into<String>,
        options: Vec<FilterOption>,
    ) -> Self {
        self.filters.push(FilterDef {
            key: field.name().to_string(),
            label: label.into(),
            options,
        });
        self.query = self.query.filter_on(field);
        self
    }

    /// Restricts the search box to the named fields.
    pub fn search_only<S: AsRef<str>>(&mut self, names: &[S]) {
        let query = std::mem::take(&mut self.query);
        self.query = query.search_only(names);
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// `true` when the table offers `label` and `session` may use it.
    pub fn allows(&self, label: &str, session: &Session) -> bool {
        self.actions
            .iter()
            .any(|a| a.label == label && a.is_visible_to(session))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.state.page_size = page_size.max(1);
        self
    }

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn filters(&self) -> &[FilterDef] {
        &self.filters
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut QueryState {
        &mut self.state
    }

    pub fn query(&self) -> &TableQuery<T> {
        &self.query
    }

    pub fn search_enabled(&self) -> bool {
        !self.query.search_fields().is_empty()
    }

    /// The search box changed.
    pub fn type_search(&mut self, term: impl Into<String>) {
        self.state.set_search(term);
    }

    /// A filter selector changed; `""` selects "All".
    pub fn select_filter(&mut self, key: &str, value: impl Into<String>) {
        self.state.set_filter(key, value);
    }

    /// A column header was clicked. Returns `false` if the column is not
    /// sortable.
    pub fn click_header(&mut self, key: &str) -> bool {
        let sortable = self.columns.iter().any(|c| c.sortable && c.key() == key);
        if sortable {
            self.state.toggle_sort(key);
        }
        sortable
    }

    /// Next page, stopping at the last page of the latest view.
    pub fn next_page(&mut self) {
        self.state.next_page(self.page_count);
    }

    pub fn prev_page(&mut self) {
        self.state.prev_page();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    /// Export columns matching the displayed columns.
    pub fn export_columns(&self) -> Vec<ExportColumn<T>> {
        self.columns
            .iter()
            .map(|c| ExportColumn::new(c.field.clone(), c.label.clone()))
            .collect()
    }

    /// Derives the screen from `records`.
    ///
    /// The current page is first clamped to the page count of the result,
    /// so a search that shrinks the result never strands the view on an
    /// empty page.
    pub fn view<'a>(&mut self, records: &'a [T], session: &Session) -> TableView<'a, T>
    where
        T: repairdesk_query::Record,
        <T as repairdesk_query::Record>::Id: fmt::Display,
    {
        let ordered = self.query.select(records, &self.state);
        let size = self.state.effective_page_size();
        self.page_count = page_count(ordered.len(), size);
        self.state.clamp_page(self.page_count);

        let page = Page::slice(&ordered, PageRequest::new(self.state.page, size));
        debug!(
            page = page.page,
            page_count = page.page_count,
            total = page.total_count,
            "table view"
        );

        let headers = self
            .columns
            .iter()
            .map(|c| HeaderView {
                key: c.key().to_string(),
                label: c.label.clone(),
                sort: c.sortable.then(|| self.indicator(c.key())),
            })
            .collect();

        let rows = page
            .items
            .iter()
            .map(|record| RowView {
                id: record.id().to_string(),
                cells: self.columns.iter().map(|c| c.display(record)).collect(),
            })
            .collect();

        let filters = self
            .filters
            .iter()
            .map(|f| FilterView {
                key: f.key.clone(),
                label: f.label.clone(),
                selected: self
                    .state
                    .filters
                    .get(&f.key)
                    .filter(|v| !v.is_empty())
                    .cloned(),
                options: f.options.clone(),
            })
            .collect();

        TableView {
            page,
            search_term: self.state.search_term.clone(),
            search_enabled: self.search_enabled(),
            filters,
            headers,
            rows,
            actions: self
                .actions
                .iter()
                .filter(|a| a.is_visible_to(session))
                .map(|a| a.label.clone())
                .collect(),
        }
    }

    fn indicator(&self, key: &str) -> SortIndicator {
        match &self.state.sort {
            Some(sort) if sort.field == key => match sort.dir {
                repairdesk_query::Dir::Asc => SortIndicator::Ascending,
                repairdesk_query::Dir::Desc => SortIndicator::Descending,
            },
            _ => SortIndicator::Unsorted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repairdesk_query::Record;

    #[derive(Debug, Clone)]
    struct Client {
        id: u32,
        name: &'static str,
        status: &'static str,
        spent: u32,
    }

    impl Record for Client {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "name" => Value::text(self.name),
                "status" => Value::text(self.status),
                "spent" => Value::from(self.spent),
                _ => Value::None,
            }
        }
    }

    fn clients() -> Vec<Client> {
        vec![
            Client { id: 1, name: "Ivanov", status: "active", spent: 45000 },
            Client { id: 2, name: "Petrov", status: "vip", spent: 250000 },
            Client { id: 3, name: "Sidorov", status: "active", spent: 12000 },
        ]
    }

    fn table() -> DataTable<Client> {
        DataTable::new()
            .column(ColumnDef::new(Field::named("name"), "Name").sortable())
            .column(ColumnDef::new(Field::named("status"), "Status"))
            .column(
                ColumnDef::new(Field::named("spent"), "Spent")
                    .sortable()
                    .render_with(|v, _| format!("₽{}", v)),
            )
            .search_in(Field::named("name"))
            .filter(
                Field::named("status"),
                "Status",
                vec![FilterOption::new("active", "Active"), FilterOption::new("vip", "VIP")],
            )
            .action(Action::new("View"))
            .action(Action::new("Edit").require(&[Role::Admin, Role::Manager]))
            .action(Action::new("Delete").require(&[Role::Admin]))
    }

    #[test]
    fn header_indicators_cycle() {
        let records = clients();
        let session = Session::as_role(Role::Admin);
        let mut t = table();

        let symbols = |t: &mut DataTable<Client>| -> Vec<Option<&'static str>> {
            t.view(&records, &session)
                .headers
                .iter()
                .map(|h| h.sort.map(SortIndicator::symbol))
                .collect()
        };

        assert_eq!(symbols(&mut t), [Some("↕"), None, Some("↕")]);
        assert!(t.click_header("name"));
        assert_eq!(symbols(&mut t), [Some("↑"), None, Some("↕")]);
        t.click_header("name");
        assert_eq!(symbols(&mut t), [Some("↓"), None, Some("↕")]);
        t.click_header("name");
        assert_eq!(symbols(&mut t), [Some("↕"), None, Some("↕")]);
        assert!(!t.click_header("status"));
    }

    #[test]
    fn cells_use_render_transforms() {
        let records = clients();
        let mut t = table();
        t.click_header("spent");
        let view = t.view(&records, &Session::new());
        assert_eq!(view.rows[0].id, "3");
        assert_eq!(view.rows[0].cells, ["Sidorov", "active", "₽12000"]);
    }

    #[test]
    fn actions_follow_the_session() {
        let records = clients();
        let mut t = table();
        assert_eq!(t.view(&records, &Session::new()).actions, ["View"]);
        assert_eq!(
            t.view(&records, &Session::as_role(Role::Manager)).actions,
            ["View", "Edit"]
        );
        assert_eq!(
            t.view(&records, &Session::as_role(Role::Admin)).actions,
            ["View", "Edit", "Delete"]
        );
    }

    #[test]
    fn allows_checks_label_and_role() {
        let t = table();
        assert!(t.allows("Edit", &Session::as_role(Role::Manager)));
        assert!(!t.allows("Delete", &Session::as_role(Role::Manager)));
        assert!(!t.allows("Archive", &Session::as_role(Role::Admin)));
        assert!(t.allows("View", &Session::new()));
    }

    #[test]
    fn record_tables_filter_on_any_field() {
        let records = clients();
        let mut t = DataTable::<Client>::for_records()
            .column(ColumnDef::new(Field::named("name"), "Name"))
            .search_in(Field::named("name"));
        t.state_mut().set_filter("status", "vip");
        let view = t.view(&records, &Session::new());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells, ["Petrov"]);
        assert!(view.filters.is_empty());

        let mut plain = table();
        plain.state_mut().set_filter("spent", "45000");
        assert_eq!(plain.view(&records, &Session::new()).page.total_count, 1);
        plain.state_mut().set_filter("missing", "x");
        assert_eq!(plain.view(&records, &Session::new()).page.total_count, 0);
    }

    #[test]
    fn view_clamps_a_stranded_page() {
        let records = clients();
        let session = Session::new();
        let mut t = table().with_page_size(1);

        t.view(&records, &session);
        t.next_page();
        t.next_page();
        t.next_page();
        assert_eq!(t.state().page, 3);

        t.type_search("petrov");
        let view = t.view(&records, &session);
        assert_eq!(view.page.page, 1);
        assert_eq!(view.rows[0].cells[0], "Petrov");
        assert_eq!(t.state().page, 1);
    }

    #[test]
    fn summary_only_with_several_pages() {
        let records = clients();
        let session = Session::new();

        let mut t = table().with_page_size(2);
        t.go_to_page(2);
        let view = t.view(&records, &session);
        assert_eq!(view.summary().as_deref(), Some("Showing 3-3 of 3"));
        assert_eq!(view.pager(), "2 / 2");

        let mut single = table();
        assert_eq!(single.view(&records, &session).summary(), None);
    }

    #[test]
    fn filter_selection_shows_in_view() {
        let records = clients();
        let mut t = table();
        t.select_filter("status", "vip");
        let view = t.view(&records, &Session::new());
        assert_eq!(view.filters[0].selected.as_deref(), Some("vip"));
        assert_eq!(view.page.total_count, 1);

        t.select_filter("status", "");
        let view = t.view(&records, &Session::new());
        assert_eq!(view.filters[0].selected, None);
        assert_eq!(view.page.total_count, 3);
    }
}
