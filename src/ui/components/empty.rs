//! Empty state component renderer.

use super::Rect;
use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the message and subtitle centered in `area`.
pub fn render_empty_state(out: &mut String, area: Rect, empty: &EmptyState, theme: &Theme) {
    let middle = area.row + area.height / 2;
    let lines = [
        (middle.saturating_sub(1), &empty.message, Theme::fg(&theme.colors.empty_state_fg)),
        (middle, &empty.subtitle, Theme::fg(&theme.colors.text_dim)),
    ];

    for (row, text, color) in lines {
        let text = truncate(text, area.width);
        let padding = area.width.saturating_sub(text.chars().count()) / 2;
        position_cursor(out, row.max(area.row), area.col + padding);
        out.push_str(&color);
        out.push_str(&text);
        out.push_str(Theme::reset());
    }
}
