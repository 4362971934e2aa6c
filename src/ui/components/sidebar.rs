//! Deck list in the left column.

use super::Rect;
use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DeckItem;

/// Renders one row per deck inside `area`.
///
/// ```text
/// › Spanish          12
///   French            3
/// ```
///
/// The selected deck uses the selection colors; the focused one carries the
/// `›` marker.
pub fn render_sidebar(out: &mut String, area: Rect, decks: &[DeckItem], theme: &Theme) {
    for (offset, deck) in decks.iter().take(area.height).enumerate() {
        let count = deck.card_count.to_string();
        let name_width = area.width.saturating_sub(count.len() + 3);

        position_cursor(out, area.row + offset, area.col);
        if deck.is_focused {
            out.push_str(&Theme::fg(&theme.colors.focus_fg));
            out.push('›');
        } else {
            out.push(' ');
        }

        if deck.is_selected {
            out.push_str(&Theme::fg(&theme.colors.selection_fg));
            out.push_str(&Theme::bg(&theme.colors.selection_bg));
        } else {
            out.push_str(&Theme::fg(&theme.colors.text_normal));
        }
        out.push(' ');
        out.push_str(&fit(&deck.name, name_width));
        out.push(' ');
        out.push_str(&count);
        out.push_str(Theme::reset());
    }
}
