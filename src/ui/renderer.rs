//! Top-level rendering entry point.
//!
//! Rendering is two steps: the coordinator computes a [`UIViewModel`], then
//! the components draw it into a frame buffer. The caller prints the frame.
//!
//! ```rust
//! use flashdeck::app::ViewCoordinator;
//! use flashdeck::storage::{MemoryStore, PersistentStore, DEFAULT_MAX_SNAPSHOT_BYTES};
//! use flashdeck::ui::{render, Theme};
//!
//! let store = PersistentStore::new(Box::new(MemoryStore::new()), "demo", DEFAULT_MAX_SNAPSHOT_BYTES);
//! let app = ViewCoordinator::new(store, Theme::default(), 150);
//! let frame = render(&app, 24, 80);
//! assert!(frame.contains("No decks yet"));
//! ```

use crate::app::ViewCoordinator;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders the coordinator's current state as one ANSI frame.
#[must_use]
pub fn render(app: &ViewCoordinator, rows: usize, cols: usize) -> String {
    let viewmodel = app.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, app.theme(), rows, cols)
}

/// Renders a precomputed view model.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let _span = tracing::trace_span!("render", rows = rows, cols = cols).entered();

    let mut frame = String::with_capacity(rows * cols * 4);
    components::render_layout(&mut frame, vm, theme, rows, cols);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardDraft;
    use crate::storage::{MemoryStore, PersistentStore, DEFAULT_MAX_SNAPSHOT_BYTES};
    use chrono::Utc;

    fn app() -> ViewCoordinator {
        let store = PersistentStore::new(Box::new(MemoryStore::new()), "test", DEFAULT_MAX_SNAPSHOT_BYTES);
        ViewCoordinator::new(store, Theme::default(), 150)
    }

    /// Drops ANSI escape sequences, keeping printable text.
    fn plain(frame: &str) -> String {
        let mut out = String::new();
        let mut chars = frame.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn empty_registry_shows_onboarding() {
        let frame = plain(&render(&app(), 24, 80));
        assert!(frame.contains("No decks yet"));
        assert!(frame.contains("n: new deck"));
    }

    #[test]
    fn selected_deck_cards_are_listed() {
        let mut app = app();
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();

        let frame = plain(&render(&app, 24, 80));
        assert!(frame.contains("Spanish"));
        assert!(frame.contains("hola"));
        assert!(!frame.contains("hello"));
    }

    #[test]
    fn study_and_modal_overlays() {
        let mut app = app();
        let deck = app.create_deck("Spanish").unwrap();
        app.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();

        app.enter_study(Utc::now()).unwrap();
        let frame = plain(&render(&app, 24, 80));
        assert!(frame.contains("Studying Spanish"));
        assert!(frame.contains("1 / 1"));
        assert!(frame.contains("[front]"));
        app.exit_study(Utc::now());

        app.open_prompt(crate::app::PromptKind::RenameDeck(deck.id));
        let frame = plain(&render(&app, 24, 80));
        assert!(frame.contains("Rename deck"));
        assert!(frame.contains("> Spanish"));
        assert!(frame.contains("[ Cancel ]"));
    }

    #[test]
    fn tiny_panes_do_not_panic() {
        let mut app = app();
        app.create_deck("A deck with a rather long name").unwrap();
        app.open_prompt(crate::app::PromptKind::NewDeck);
        for (rows, cols) in [(1, 1), (3, 10), (0, 0), (10, 20)] {
            let _ = render(&app, rows, cols);
        }
    }
}
