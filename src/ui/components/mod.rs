//! Composable UI component renderers.
//!
//! Each component draws one part of the frame into the shared buffer.
//!
//! # Components
//!
//! - [`header`]: Title line
//! - [`toolbar`]: New deck / add card / study buttons
//! - [`search`]: Search input box
//! - [`sidebar`]: Deck list
//! - [`grid`]: Cards of the selected deck
//! - [`study`]: Study overlay replacing the grid
//! - [`modal`]: Prompt dialog drawn last, over the body
//! - [`empty`]: Message shown when there is nothing to list
//! - [`footer`]: Keybinding hints and status
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines]
//! [Toolbar]
//! [Sidebar │ Grid / Study / Empty state]   ← modal centered here
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod grid;
mod header;
mod modal;
mod search;
mod sidebar;
mod study;
mod toolbar;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::render_footer;
use grid::render_grid;
use header::render_header;
use modal::render_modal;
use search::render_search_bar;
use sidebar::render_sidebar;
use study::render_study;
use toolbar::render_toolbar;

/// A rectangular region of the pane, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

/// Narrowest and widest sidebar.
const SIDEBAR_MIN: usize = 16;
const SIDEBAR_MAX: usize = 32;

/// Renders a horizontal border line at `row` and returns the next row.
fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders the full layout for a `rows` × `cols` pane.
pub fn render_layout(out: &mut String, vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2;
    current_row = render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);
    current_row = render_search_bar(out, current_row, &vm.search_bar, theme, cols);
    current_row = render_toolbar(out, current_row, &vm.toolbar, theme, cols);

    let footer_row = rows.saturating_sub(1).max(current_row + 2);
    let border_row = footer_row - 1;
    let body_height = border_row.saturating_sub(current_row);

    let sidebar_width = (cols / 3).clamp(SIDEBAR_MIN, SIDEBAR_MAX).min(cols);
    let sidebar = Rect {
        row: current_row,
        col: 1,
        width: sidebar_width,
        height: body_height,
    };
    let main = Rect {
        row: current_row,
        col: sidebar_width + 3,
        width: cols.saturating_sub(sidebar_width + 3),
        height: body_height,
    };

    render_sidebar(out, sidebar, &vm.decks, theme);
    for offset in 0..body_height {
        position_cursor(out, current_row + offset, sidebar_width + 1);
        out.push_str(&Theme::fg(&theme.colors.border));
        out.push('│');
        out.push_str(Theme::reset());
    }

    if let Some(study) = &vm.study {
        render_study(out, main, study, theme);
    } else if let Some(empty) = &vm.empty_state {
        render_empty_state(out, main, empty, theme);
    } else {
        render_grid(out, main, &vm.cards, theme);
    }

    if let Some(modal) = &vm.modal {
        let body = Rect {
            row: current_row,
            col: 1,
            width: cols,
            height: body_height,
        };
        render_modal(out, body, modal, theme);
    }

    render_border(out, border_row, &theme.colors.border, cols);
    render_footer(out, footer_row, &vm.footer, theme, cols);
}
