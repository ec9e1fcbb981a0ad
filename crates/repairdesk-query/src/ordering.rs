//! Sort direction, sort keys and the header toggle cycle.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::value::{Value, ValueKind};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dir {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(QueryError::InvalidDirection(s.to_string())),
        }
    }
}

/// The active sort: one field and a direction. There is no secondary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl SortKey {
    /// Creates a new ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            dir: Dir::Desc,
        }
    }
}

/// Parses `field` or `field:dir`, e.g. `name:desc`.
impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, dir) = match s.split_once(':') {
            Some((field, dir)) => (field.trim(), dir.parse()?),
            None => (s.trim(), Dir::Asc),
        };
        if field.is_empty() {
            return Err(QueryError::InvalidSort(s.to_string()));
        }
        Ok(SortKey {
            field: field.to_string(),
            dir,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.dir)
    }
}

/// Applies one sort-header click to the current sort.
///
/// Clicking the sorted column cycles asc → desc → unsorted. Clicking any
/// other column starts that column ascending.
pub fn toggle_sort(current: Option<&SortKey>, field: &str) -> Option<SortKey> {
    match current {
        Some(key) if key.field == field => match key.dir {
            Dir::Asc => Some(SortKey::desc(field)),
            Dir::Desc => None,
        },
        _ => Some(SortKey::asc(field)),
    }
}

/// Natural ordering of two field values.
///
/// Numbers compare numerically, text lexicographically, `false < true`.
/// Missing and empty values compare equal to each other and sort before
/// everything else. Values of different kinds are ranked
/// bool < number < text so the ordering stays total.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => sort_rank(a).cmp(&sort_rank(b)),
    }
}

/// Returns `true` when two non-empty values have different kinds.
pub fn is_mixed(a: &Value<'_>, b: &Value<'_>) -> bool {
    let (ka, kb) = (sort_rank(a), sort_rank(b));
    ka != ValueKind::None && kb != ValueKind::None && ka != kb
}

fn sort_rank(v: &Value<'_>) -> ValueKind {
    match v {
        Value::Text(s) if s.is_empty() => ValueKind::None,
        other => other.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn dir_parse_and_display() {
        assert_eq!("DESC".parse::<Dir>().unwrap(), Dir::Desc);
        assert_eq!("ascending".parse::<Dir>().unwrap(), Dir::Asc);
        assert!("sideways".parse::<Dir>().is_err());
        assert_eq!(Dir::Desc.to_string(), "desc");
    }

    #[test]
    fn sort_key_parse() {
        assert_eq!("name:desc".parse::<SortKey>().unwrap(), SortKey::desc("name"));
        assert_eq!("total".parse::<SortKey>().unwrap(), SortKey::asc("total"));
        assert!(":desc".parse::<SortKey>().is_err());
        assert!("name:up".parse::<SortKey>().is_err());
        assert_eq!(SortKey::desc("name").to_string(), "name:desc");
    }

    #[test]
    fn toggle_cycles_on_same_column() {
        let first = toggle_sort(None, "name");
        assert_eq!(first, Some(SortKey::asc("name")));
        let second = toggle_sort(first.as_ref(), "name");
        assert_eq!(second, Some(SortKey::desc("name")));
        let third = toggle_sort(second.as_ref(), "name");
        assert_eq!(third, None);
    }

    #[test]
    fn toggle_other_column_resets_to_asc() {
        let desc = SortKey::desc("name");
        assert_eq!(toggle_sort(Some(&desc), "total"), Some(SortKey::asc("total")));
        let asc = SortKey::asc("name");
        assert_eq!(toggle_sort(Some(&asc), "total"), Some(SortKey::asc("total")));
    }

    #[test]
    fn compare_same_kinds() {
        assert_eq!(
            compare_values(&Value::text("apple"), &Value::text("banana")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from(10u32), &Value::from(9u32)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::from(false), &Value::from(true)),
            Ordering::Less
        );
    }

    #[test]
    fn numbers_are_not_compared_as_text() {
        // "10" < "9" as text, but 10 > 9 as numbers
        assert_eq!(
            compare_values(
                &Value::Number(Number::I64(10)),
                &Value::Number(Number::I64(9))
            ),
            Ordering::Greater
        );
    }

    #[test]
    fn missing_equals_empty_and_sorts_first() {
        assert_eq!(compare_values(&Value::None, &Value::text("")), Ordering::Equal);
        assert_eq!(compare_values(&Value::None, &Value::None), Ordering::Equal);
        assert_eq!(compare_values(&Value::None, &Value::text("a")), Ordering::Less);
        assert_eq!(compare_values(&Value::from(1u8), &Value::None), Ordering::Greater);
    }

    #[test]
    fn mixed_kinds_rank_and_are_flagged() {
        let n = Value::from(5u32);
        let s = Value::text("5");
        assert_eq!(compare_values(&n, &s), Ordering::Less);
        assert!(is_mixed(&n, &s));
        assert!(!is_mixed(&n, &Value::None));
        assert!(!is_mixed(&s, &Value::text("6")));
    }
}
