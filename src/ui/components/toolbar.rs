//! Toolbar of action buttons above the sidebar and grid.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ToolbarButton;

/// Renders `[ label ]` buttons on one line. The focused one is drawn in
/// reverse video, disabled ones dimmed.
pub fn render_toolbar(out: &mut String, row: usize, buttons: &[ToolbarButton], theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    let mut used = 1;
    out.push(' ');

    for button in buttons {
        let label = format!("[ {} ]", button.label);
        let width = label.chars().count() + 1;
        if used + width > cols {
            break;
        }

        if button.is_focused {
            out.push_str(&Theme::fg(&theme.colors.focus_fg));
            out.push_str(Theme::reverse());
        } else if button.is_enabled {
            out.push_str(&Theme::fg(&theme.colors.text_normal));
        } else {
            out.push_str(&Theme::fg(&theme.colors.text_dim));
        }
        out.push_str(&label);
        out.push_str(Theme::reset());
        out.push(' ');
        used += width;
    }

    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    row + 1
}
