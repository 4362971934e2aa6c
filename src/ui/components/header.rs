//! Header component renderer.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the centered title line at `row` and returns the next row.
///
/// ```text
/// [padding] Flashdeck · Spanish · 12 cards [padding]
/// ```
pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let line = truncate(&format!("{} · {}", header.title, header.subtitle), cols);
    let line_len = line.chars().count();
    let padding = cols.saturating_sub(line_len) / 2;

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }

    out.push_str(&" ".repeat(padding));
    out.push_str(&line);
    out.push_str(&" ".repeat(cols.saturating_sub(padding + line_len)));

    out.push_str(Theme::reset());
    row + 1
}
