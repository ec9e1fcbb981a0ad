//! Plain-text rendering of table views.
//!
//! Column widths are measured in terminal columns, so Cyrillic names and
//! the `₽` sign line up the same as ASCII.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::table::TableView;

/// Cells wider than this are cut with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 32;

const ELLIPSIS: &str = "…";

/// Display width in terminal columns.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Cuts `s` to `max_width` columns, ending in `…` when cut.
///
/// ```rust
/// use repairdesk::render::truncate_end;
///
/// assert_eq!(truncate_end("Petrova Maria", 8), "Petrova…");
/// assert_eq!(truncate_end("Ivanov", 8), "Ivanov");
/// ```
pub fn truncate_end(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let limit = max_width - ELLIPSIS.width();
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > limit {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Left-aligns `s` in `width` columns. Longer text is left as is.
pub fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    let mut out = String::with_capacity(s.len() + fill);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(fill));
    out
}

/// Renders a header row, a rule and the rows as aligned columns.
pub fn grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate_end(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(cell));
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad_right(cells.get(i).map(String::as_str).unwrap_or(""), *w))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Renders a listing screen: title, search and filter state, the grid,
/// then the summary and pager.
pub fn render_view<T>(title: &str, view: &TableView<'_, T>) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    let mut controls = Vec::new();
    if view.search_enabled && !view.search_term.is_empty() {
        controls.push(format!("Search: \"{}\"", view.search_term));
    }
    for filter in &view.filters {
        if let Some(selected) = &filter.selected {
            let label = filter
                .options
                .iter()
                .find(|o| &o.value == selected)
                .map(|o| o.label.as_str())
                .unwrap_or(selected);
            controls.push(format!("{}: {}", filter.label, label));
        }
    }
    if !controls.is_empty() {
        out.push_str(&controls.join("  "));
        out.push('\n');
    }
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str("No records found\n");
        return out;
    }

    let mut headers: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sort {
            Some(indicator) => format!("{} {}", h.label, indicator.symbol()),
            None => h.label.clone(),
        })
        .collect();
    let with_actions = !view.actions.is_empty();
    if with_actions {
        headers.push("Actions".to_string());
    }

    let actions = view.actions.join(", ");
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            if with_actions {
                cells.push(actions.clone());
            }
            cells
        })
        .collect();
    out.push_str(&grid(&headers, &rows));

    out.push('\n');
    if let Some(summary) = view.summary() {
        out.push_str(&summary);
        out.push('\n');
    }
    out.push_str(&format!("Page {}\n", view.pager()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_count_columns_not_bytes() {
        assert_eq!(display_width("Иванов"), 6);
        assert_eq!(display_width("₽45 000"), 7);
        assert_eq!(pad_right("Иванов", 8), "Иванов  ");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_end("ООО \"ТехКомпани\"", 6), "ООО \"…");
        assert_eq!(truncate_end("abc", 0), "");
        assert_eq!(truncate_end("abc", 1), "…");
    }

    #[test]
    fn grid_aligns_columns() {
        let headers = vec!["Name ↑".to_string(), "Spent".to_string()];
        let rows = vec![
            vec!["Иванов".to_string(), "₽45 000".to_string()],
            vec!["Li".to_string(), "₽0".to_string()],
        ];
        assert_eq!(
            grid(&headers, &rows),
            "Name ↑ | Spent\n\
             -------+--------\n\
             Иванов | ₽45 000\n\
             Li     | ₽0\n"
        );
    }
}
