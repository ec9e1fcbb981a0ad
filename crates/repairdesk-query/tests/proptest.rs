//! Property-based tests for the query pipeline.

use proptest::prelude::*;
use repairdesk_query::{Field, Page, QueryState, Record, SortKey, TableQuery, Value};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: usize,
    name: String,
    status: String,
    amount: i64,
}

impl Record for Row {
    type Id = usize;

    fn id(&self) -> &usize {
        &self.id
    }

    fn field(&self, name: &str) -> Value<'_> {
        match name {
            "name" => Value::text(&self.name),
            "status" => Value::text(&self.status),
            "amount" => Value::from(self.amount),
            _ => Value::None,
        }
    }
}

fn table() -> TableQuery<Row> {
    TableQuery::new()
        .search_in(Field::named("name"))
        .search_in(Field::named("status"))
        .filter_on(Field::named("status"))
        .sort_on(Field::named("name"))
        .sort_on(Field::named("amount"))
}

fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (
            "[A-Za-z]{1,8}",
            prop::sample::select(vec!["active", "vip", "inactive"]),
            -50i64..50,
        ),
        0..60,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(id, (name, status, amount))| Row {
                id,
                name,
                status: status.to_string(),
                amount,
            })
            .collect()
    })
}

fn sort_strategy() -> impl Strategy<Value = Option<SortKey>> {
    prop::option::of(
        (prop::sample::select(vec!["name", "amount"]), any::<bool>()).prop_map(|(f, desc)| {
            if desc {
                SortKey::desc(f)
            } else {
                SortKey::asc(f)
            }
        }),
    )
}

fn ids(page: &Page<'_, Row>) -> Vec<usize> {
    page.items.iter().map(|r| r.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// With an empty state the first page is a prefix of the input.
    #[test]
    fn empty_state_is_prefix(rows in rows_strategy(), size in 1usize..20) {
        let state = QueryState::new().with_page_size(size);
        let page = table().run(&rows, &state);

        let expected: Vec<usize> = rows.iter().take(size).map(|r| r.id).collect();
        prop_assert_eq!(ids(&page), expected);
        prop_assert_eq!(page.total_count, rows.len());
    }

    /// Every returned row matches the search; every row that matches appears
    /// somewhere in the pagination sweep.
    #[test]
    fn search_is_sound_and_complete(
        rows in rows_strategy(),
        term in "[a-zA-Z]{1,2}",
        size in 1usize..10,
    ) {
        let base = QueryState::new().with_search(term.clone()).with_page_size(size);
        let first = table().run(&rows, &base);
        let folded = term.to_lowercase();

        let mut seen = Vec::new();
        for page_no in 1..=first.page_count {
            let page = table().run(&rows, &base.clone().with_page(page_no));
            for row in &page.items {
                prop_assert!(
                    row.name.to_lowercase().contains(&folded)
                        || row.status.to_lowercase().contains(&folded)
                );
                seen.push(row.id);
            }
        }

        for row in &rows {
            let hit = row.name.to_lowercase().contains(&folded)
                || row.status.to_lowercase().contains(&folded);
            prop_assert_eq!(hit, seen.contains(&row.id));
        }
    }

    /// A single filter keeps exactly the rows whose value equals the selection.
    #[test]
    fn filter_equality(
        rows in rows_strategy(),
        status in prop::sample::select(vec!["active", "vip", "inactive"]),
    ) {
        let state = QueryState::new().with_filter("status", status).with_page_size(1000);
        let page = table().run(&rows, &state);

        prop_assert!(page.items.iter().all(|r| r.status == status));
        prop_assert_eq!(page.total_count, rows.iter().filter(|r| r.status == status).count());
    }

    /// Rows that compare equal on the sort field keep their input order.
    #[test]
    fn sort_is_stable(rows in rows_strategy(), desc in any::<bool>()) {
        let key = if desc { SortKey::desc("amount") } else { SortKey::asc("amount") };
        let state = QueryState::new().with_sort(key).with_page_size(1000);
        let page = table().run(&rows, &state);

        for pair in page.items.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.amount == b.amount {
                prop_assert!(a.id < b.id, "equal rows reordered");
            } else if desc {
                prop_assert!(a.amount > b.amount);
            } else {
                prop_assert!(a.amount < b.amount);
            }
        }
    }

    /// Running twice gives the same page and leaves the input alone.
    #[test]
    fn idempotent_and_pure(
        rows in rows_strategy(),
        sort in sort_strategy(),
        term in "[a-z]{0,2}",
        page_no in 1usize..5,
    ) {
        let before = rows.clone();
        let mut state = QueryState::new().with_search(term).with_page_size(4).with_page(page_no);
        state.sort = sort;

        let first = table().run(&rows, &state);
        let second = table().run(&rows, &state);
        prop_assert_eq!(ids(&first), ids(&second));
        prop_assert_eq!(first.total_count, second.total_count);
        prop_assert_eq!(&rows, &before);
    }

    /// Concatenating every page reproduces the unpaginated result once.
    #[test]
    fn pages_cover_everything_once(
        rows in rows_strategy(),
        sort in sort_strategy(),
        size in 1usize..9,
    ) {
        let mut state = QueryState::new().with_filter("status", "active").with_page_size(size);
        state.sort = sort;

        let all: Vec<usize> = table().select(&rows, &state).iter().map(|r| r.id).collect();
        let first = table().run(&rows, &state);

        let mut joined = Vec::new();
        for page_no in 1..=first.page_count {
            let page = table().run(&rows, &state.clone().with_page(page_no));
            joined.extend(ids(&page));
        }
        prop_assert_eq!(joined, all);
    }

    /// Pages past the end are empty and keep the counts.
    #[test]
    fn beyond_last_page_is_empty(rows in rows_strategy(), size in 1usize..10, extra in 1usize..5) {
        let state = QueryState::new().with_page_size(size);
        let first = table().run(&rows, &state);
        let beyond = table().run(&rows, &state.clone().with_page(first.page_count + extra));

        prop_assert!(beyond.items.is_empty());
        prop_assert_eq!(beyond.total_count, first.total_count);
        prop_assert_eq!(beyond.page_count, first.page_count);
    }
}
