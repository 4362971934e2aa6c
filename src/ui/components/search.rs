//! Search bar component renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

/// Renders the 3-line search box at `row` and returns the next row.
///
/// ```text
///   ┌──────────────────────────────────┐
///   │ Search: hol▏          3 matches │
///   └──────────────────────────────────┘
/// ```
///
/// The border takes the focus color while the field is focused.
pub fn render_search_bar(out: &mut String, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(2 * SEARCH_BOX_MARGIN).max(4);
    let inner_width = box_width - 2;
    let margin = " ".repeat(SEARCH_BOX_MARGIN);
    let border = if search.is_focused {
        Theme::fg(&theme.colors.focus_fg)
    } else {
        Theme::fg(&theme.colors.search_bar_border)
    };

    position_cursor(out, row, 1);
    out.push_str(&margin);
    out.push_str(&border);
    out.push('┌');
    out.push_str(&"─".repeat(inner_width));
    out.push('┐');
    out.push_str(Theme::reset());

    let cursor = if search.is_focused { "▏" } else { "" };
    let count = search
        .match_count
        .map(|n| format!("{n} {} ", if n == 1 { "match" } else { "matches" }))
        .unwrap_or_default();
    let query_width = inner_width.saturating_sub(count.chars().count());

    position_cursor(out, row + 1, 1);
    out.push_str(&margin);
    out.push_str(&border);
    out.push('│');
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    out.push_str(&fit(&format!(" Search: {}{cursor}", search.query), query_width));
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&count);
    out.push_str(&border);
    out.push('│');
    out.push_str(Theme::reset());

    position_cursor(out, row + 2, 1);
    out.push_str(&margin);
    out.push_str(&border);
    out.push('└');
    out.push_str(&"─".repeat(inner_width));
    out.push('┘');
    out.push_str(Theme::reset());

    row + 3
}
