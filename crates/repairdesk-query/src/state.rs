//! View-owned query state.
//!
//! [`QueryState`] is plain data: the search box text, selected filter
//! values, the active sort and the current page. It is created with
//! defaults when a listing opens and mutated by user interaction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::ordering::{toggle_sort, SortKey};

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Parameters driving one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryState {
    /// Free-text search term. Empty means no search.
    pub search_term: String,
    /// Selected filter value per field. Empty values impose no constraint.
    pub filters: BTreeMap<String, String>,
    /// Active sort, if any.
    pub sort: Option<SortKey>,
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        QueryState {
            search_term: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    /// Creates a state with default values.
    pub fn new() -> Self {
        QueryState::default()
    }

    /// Sets the page size, clamped to at least 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Selects a filter value.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(field, value);
        self
    }

    /// Sets the sort.
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Jumps to a page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Selects a value for `field`. An empty value selects "All".
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if value.is_empty() {
            self.filters.remove(&field);
        } else {
            self.filters.insert(field, value);
        }
    }

    /// Filters that actually constrain the result.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Applies a click on the sort header of `field`.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = toggle_sort(self.sort.as_ref(), field);
    }

    /// Jumps to a page, clamped to at least 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Moves forward one page, stopping at `page_count`.
    pub fn next_page(&mut self, page_count: usize) {
        self.page = (self.page + 1).min(page_count.max(1));
    }

    /// Moves back one page, stopping at 1.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Brings the page into `[1, page_count]`.
    pub fn clamp_page(&mut self, page_count: usize) {
        self.page = self.page.clamp(1, page_count.max(1));
    }

    /// Page size with the `>= 1` guard applied.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Page number with the `>= 1` guard applied.
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }
}

/// Parses a `field=value` filter expression.
///
/// The value may be empty (`status=`), which selects "All".
pub fn parse_filter(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(QueryError::InvalidFilter(s.to_string())),
    }
}
