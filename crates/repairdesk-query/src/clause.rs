//! Search and filter predicates.
//!
//! A [`SearchClause`] keeps a record when any of its fields contains the
//! term, ignoring case. A [`FilterClause`] keeps a record when the textual
//! value of one field equals the selected value exactly.

use crate::field::Field;

/// Case-insensitive substring search over several fields.
#[derive(Debug, Clone)]
pub struct SearchClause<T> {
    folded_term: String,
    fields: Vec<Field<T>>,
}

impl<T> SearchClause<T> {
    /// Creates a search for `term` over `fields`.
    pub fn new(term: &str, fields: Vec<Field<T>>) -> Self {
        SearchClause {
            folded_term: term.to_lowercase(),
            fields,
        }
    }

    /// Returns `true` when this search lets every record through.
    pub fn is_noop(&self) -> bool {
        self.folded_term.is_empty() || self.fields.is_empty()
    }

    /// Tests one record.
    pub fn matches(&self, record: &T) -> bool {
        self.is_noop()
            || self
                .fields
                .iter()
                .any(|field| field.get(record).contains_folded(&self.folded_term))
    }
}

/// Exact equality on one field's textual representation.
#[derive(Debug, Clone)]
pub struct FilterClause<T> {
    field: Field<T>,
    value: String,
}

impl<T> FilterClause<T> {
    /// Creates a filter selecting `value` on `field`.
    pub fn new(field: Field<T>, value: impl Into<String>) -> Self {
        FilterClause {
            field,
            value: value.into(),
        }
    }

    /// The filtered field's name.
    pub fn field_name(&self) -> &str {
        self.field.name()
    }

    /// The selected value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Tests one record. An empty selection matches everything.
    pub fn matches(&self, record: &T) -> bool {
        self.value.is_empty() || self.field.get(record).to_text() == self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Client {
        name: String,
        phone: Option<String>,
        orders: u32,
    }

    fn name() -> Field<Client> {
        Field::new("name", |c: &Client| Value::text(&c.name))
    }

    fn phone() -> Field<Client> {
        Field::new("phone", |c: &Client| Value::from(c.phone.as_deref()))
    }

    fn orders() -> Field<Client> {
        Field::new("orders", |c: &Client| Value::from(c.orders))
    }

    fn client(name: &str, phone: Option<&str>, orders: u32) -> Client {
        Client {
            name: name.to_string(),
            phone: phone.map(str::to_string),
            orders,
        }
    }

    #[test]
    fn search_any_field_case_insensitive() {
        let search = SearchClause::new("IVAN", vec![name(), phone()]);
        assert!(search.matches(&client("Ivanov", None, 0)));
        assert!(!search.matches(&client("Petrov", Some("+7 999"), 0)));

        let by_phone = SearchClause::new("999", vec![name(), phone()]);
        assert!(by_phone.matches(&client("Petrov", Some("+7 999"), 0)));
    }

    #[test]
    fn search_over_numbers_uses_text() {
        let search = SearchClause::new("15", vec![orders()]);
        assert!(search.matches(&client("A", None, 115)));
        assert!(!search.matches(&client("A", None, 51)));
    }

    #[test]
    fn empty_term_or_fields_is_noop() {
        assert!(SearchClause::new("", vec![name()]).is_noop());
        assert!(SearchClause::<Client>::new("x", vec![]).is_noop());
        assert!(SearchClause::<Client>::new("x", vec![]).matches(&client("y", None, 0)));
    }

    #[test]
    fn filter_is_exact_and_case_sensitive() {
        let f = FilterClause::new(name(), "Ivanov");
        assert!(f.matches(&client("Ivanov", None, 0)));
        assert!(!f.matches(&client("ivanov", None, 0)));
        assert!(!f.matches(&client("Ivanova", None, 0)));
    }

    #[test]
    fn filter_on_number_compares_text() {
        let f = FilterClause::new(orders(), "5");
        assert!(f.matches(&client("A", None, 5)));
        assert!(!f.matches(&client("A", None, 50)));
    }

    #[test]
    fn empty_filter_value_matches_all() {
        let f = FilterClause::new(phone(), "");
        assert!(f.matches(&client("A", None, 0)));
        assert_eq!(f.field_name(), "phone");
    }
}
