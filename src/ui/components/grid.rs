//! Card grid of the selected deck.
//!
//! Each card takes one row showing the side currently facing up. Search
//! matches are highlighted in place.

use super::Rect;
use crate::ui::helpers::{position_cursor, render_highlighted_text, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::CardItem;

/// Renders the cards inside `area`.
///
/// ```text
/// › F  hola
///   B  hello
/// ```
pub fn render_grid(out: &mut String, area: Rect, cards: &[CardItem], theme: &Theme) {
    for (offset, card) in cards.iter().take(area.height).enumerate() {
        render_card(out, area.row + offset, area, card, theme);
    }
}

fn render_card(out: &mut String, row: usize, area: Rect, card: &CardItem, theme: &Theme) {
    position_cursor(out, row, area.col);

    if card.is_focused {
        out.push_str(&Theme::fg(&theme.colors.focus_fg));
        out.push_str("› ");
    } else {
        out.push_str("  ");
    }

    let (side, color) = if card.is_flipped {
        ('B', &theme.colors.card_back_fg)
    } else {
        ('F', &theme.colors.text_normal)
    };
    let style = Theme::fg(color);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push(side);
    out.push_str("  ");
    out.push_str(&style);

    let text = truncate(&card.text.replace('\n', " "), area.width.saturating_sub(5));
    render_highlighted_text(out, &text, &card.highlight_ranges, theme, &style);
    out.push_str(Theme::reset());
}
