//! Prompt modal drawn over the body.

use super::Rect;
use crate::ui::document::{MODAL_CANCEL, MODAL_CLOSE, MODAL_CONFIRM, MODAL_INPUT};
use crate::ui::helpers::{fit, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ModalView;

const MODAL_WIDTH: usize = 52;
const MODAL_HEIGHT: usize = 7;

/// Renders the modal centered in `area`.
///
/// ```text
/// ┌ Rename deck ───────────────────────── [x] ┐
/// │                                           │
/// │  > Spanish▏                               │
/// │                                           │
/// │                       [ Cancel ] [ OK ]   │
/// └───────────────────────────────────────────┘
/// ```
pub fn render_modal(out: &mut String, area: Rect, modal: &ModalView, theme: &Theme) {
    let width = MODAL_WIDTH.min(area.width).max(16);
    let inner = width - 2;
    let top = area.row + area.height.saturating_sub(MODAL_HEIGHT) / 2;
    let left = area.col + area.width.saturating_sub(width) / 2;
    let border = Theme::fg(&theme.colors.modal_border);
    let focused = |id: &str| modal.focused_control.as_deref() == Some(id);

    let close = control("[x]", focused(MODAL_CLOSE), theme);
    let title = truncate(&format!(" {} ", modal.title), inner.saturating_sub(5));
    position_cursor(out, top, left);
    out.push_str(&border);
    out.push('┌');
    out.push_str(Theme::bold());
    out.push_str(&title);
    out.push_str(Theme::reset());
    out.push_str(&border);
    out.push_str(&"─".repeat(inner.saturating_sub(title.chars().count() + 4)));
    out.push_str(&close);
    out.push_str(&border);
    out.push('─');
    out.push('┐');

    let body_line = |out: &mut String, row: usize, content: &str, content_len: usize| {
        position_cursor(out, row, left);
        out.push_str(&border);
        out.push('│');
        out.push_str(Theme::reset());
        out.push_str(content);
        out.push_str(&" ".repeat(inner.saturating_sub(content_len)));
        out.push_str(&border);
        out.push('│');
    };

    body_line(out, top + 1, "", 0);

    if modal.show_input {
        let cursor = if focused(MODAL_INPUT) { "▏" } else { "" };
        let field = fit(&format!("  > {}{cursor}", modal.value), inner);
        let style = if focused(MODAL_INPUT) {
            Theme::fg(&theme.colors.focus_fg)
        } else {
            Theme::fg(&theme.colors.text_normal)
        };
        body_line(out, top + 2, &format!("{style}{field}{}", Theme::reset()), inner);
    } else {
        body_line(out, top + 2, "", 0);
    }

    body_line(out, top + 3, "", 0);

    let buttons = format!(
        "{} {}",
        control("[ Cancel ]", focused(MODAL_CANCEL), theme),
        control("[ OK ]", focused(MODAL_CONFIRM), theme)
    );
    let buttons_len = "[ Cancel ] [ OK ]".len();
    let pad = inner.saturating_sub(buttons_len + 2);
    body_line(out, top + 4, &format!("{}{buttons}", " ".repeat(pad)), pad + buttons_len);

    body_line(out, top + 5, "", 0);

    position_cursor(out, top + 6, left);
    out.push_str(&border);
    out.push('└');
    out.push_str(&"─".repeat(inner));
    out.push('┘');
    out.push_str(Theme::reset());
}

fn control(label: &str, is_focused: bool, theme: &Theme) -> String {
    if is_focused {
        format!("{}{}{label}{}", Theme::fg(&theme.colors.focus_fg), Theme::reverse(), Theme::reset())
    } else {
        format!("{}{label}{}", Theme::fg(&theme.colors.text_dim), Theme::reset())
    }
}
