//! Footer component renderer.
//!
//! Keybinding hints on the left, the last status message on the right.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer at `row` and returns the next row.
///
/// The status message wins when both do not fit.
pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let status = footer
        .status
        .as_deref()
        .map(|s| truncate(s, cols))
        .unwrap_or_default();
    let status_len = status.chars().count();
    let hints = truncate(&footer.keybindings, cols.saturating_sub(status_len + 1));
    let hints_len = hints.chars().count();

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&hints);
    out.push_str(&" ".repeat(cols.saturating_sub(hints_len + status_len)));
    out.push_str(&Theme::fg(&theme.colors.status_fg));
    out.push_str(&status);
    out.push_str(Theme::reset());
    row + 1
}
