//! Study overlay drawn in place of the card grid.

use super::Rect;
use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StudyView;

/// Renders the current study card.
///
/// ```text
/// Studying Spanish                   2 / 12
///
///                [front]
///                 hola
/// ```
pub fn render_study(out: &mut String, area: Rect, study: &StudyView, theme: &Theme) {
    let progress = format!("{} / {}", study.position, study.total);
    let title = truncate(
        &format!("Studying {}", study.deck_name),
        area.width.saturating_sub(progress.len() + 1),
    );

    position_cursor(out, area.row, area.col);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    out.push_str(&title);
    out.push_str(Theme::reset());
    out.push_str(&" ".repeat(area.width.saturating_sub(title.chars().count() + progress.len())));
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&progress);
    out.push_str(Theme::reset());

    let middle = area.row + area.height / 2;
    let label = format!("[{}]", study.side_label);
    let color = if study.side_label == "back" {
        &theme.colors.card_back_fg
    } else {
        &theme.colors.text_normal
    };

    let lines = [
        (middle.saturating_sub(1), label, Theme::fg(&theme.colors.text_dim)),
        (middle, study.text.replace('\n', " "), Theme::fg(color)),
    ];
    for (row, text, style) in lines {
        let text = truncate(&text, area.width);
        let padding = area.width.saturating_sub(text.chars().count()) / 2;
        position_cursor(out, row.max(area.row + 1), area.col + padding);
        out.push_str(&style);
        out.push_str(&text);
        out.push_str(Theme::reset());
    }
}
