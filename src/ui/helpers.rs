//! Shared rendering utilities.
//!
//! Components draw into a `String` frame buffer instead of stdout, so a
//! whole frame can be built, inspected in tests, and printed in one go.
//! All widths and ranges are in characters, not bytes.

use crate::ui::theme::Theme;

/// Appends an ANSI cursor move to `row`, `col` (both 1-indexed).
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    out.push_str(&format!("\u{1b}[{row};{col}H"));
}

/// First `width` characters of `text`, with `…` replacing the last one when
/// something was cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// `text` truncated and right-padded with spaces to exactly `width` characters.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{cut}{}", " ".repeat(pad))
}

/// Appends `text` with the given character ranges highlighted.
///
/// Ranges past the end of the text are clipped. After each highlight the
/// `restore` style is re-applied so the surrounding colors continue.
pub fn render_highlighted_text(out: &mut String, text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) {
    if ranges.is_empty() {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current = 0;

    for &(start, end) in ranges {
        let start = start.clamp(current, chars.len());
        let end = end.clamp(start, chars.len());
        out.extend(&chars[current..start]);
        if start < end {
            out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
            out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
            out.extend(&chars[start..end]);
            out.push_str(Theme::reset());
            out.push_str(restore);
        }
        current = end;
    }

    out.extend(&chars[current..]);
}
