//! Derived view state and view model computation.
//!
//! The coordinator's registry subscription feeds every [`RegistryEvent`] into
//! a shared [`ViewTracker`], which decides which views went stale. Only views
//! that actually display the changed data are marked, so the host re-renders
//! exactly when something visible changed.
//!
//! # View Model Layout
//!
//! ```text
//! ┌ header ─────────────────────────────────────────┐
//! │ sidebar (decks)  │ search bar                   │
//! │                  │ card grid / study overlay    │
//! ├ footer (hints, status) ─────────────────────────┤
//! ```

use crate::app::ViewCoordinator;
use crate::domain::FlipState;
use crate::focus::FocusHost;
use crate::registry::RegistryEvent;
use crate::ui::document::{Target, MODAL_CANCEL, MODAL_CLOSE, MODAL_CONFIRM, MODAL_INPUT};
use crate::ui::viewmodel::{
    CardItem, DeckItem, EmptyState, FooterInfo, HeaderInfo, ModalView, SearchBarInfo, StudyView,
    ToolbarButton, UIViewModel,
};

/// Views that need re-rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyViews {
    pub sidebar: bool,
    pub grid: bool,
    pub search: bool,
    pub study: bool,
    pub modal: bool,
    pub footer: bool,
}

impl DirtyViews {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            sidebar: true,
            grid: true,
            search: true,
            study: true,
            modal: true,
            footer: true,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.sidebar || self.grid || self.search || self.study || self.modal || self.footer)
    }
}

/// State shared between the coordinator and its registry subscription.
#[derive(Debug, Default)]
pub struct ViewTracker {
    pub dirty: DirtyViews,
    /// Deck shown in the card grid.
    pub displayed_deck: Option<u64>,
    /// Deck being studied, if study mode is on.
    pub studied_deck: Option<u64>,
    pub persist_requested: bool,
    /// The studied deck changed and the session must re-read it.
    pub study_stale: bool,
    /// Flip state of the card grid.
    pub flips: FlipState,
}

impl ViewTracker {
    /// Applies one registry notification.
    pub fn observe(&mut self, event: &RegistryEvent) {
        let deck_id = event.deck().id;
        let displayed = self.displayed_deck == Some(deck_id);
        let studied = self.studied_deck == Some(deck_id);

        match event {
            RegistryEvent::DeckCreated(_) => self.dirty.sidebar = true,
            RegistryEvent::DeckUpdated(_) => {
                self.dirty.sidebar = true;
                self.dirty.grid |= displayed;
                self.dirty.study |= studied;
            }
            RegistryEvent::DeckDeleted(_) => {
                self.dirty.sidebar = true;
                if displayed {
                    self.displayed_deck = None;
                    self.flips.reset();
                    self.dirty.grid = true;
                    self.dirty.search = true;
                }
                self.study_stale |= studied;
            }
            RegistryEvent::DeckSelected(_) => {
                if !displayed {
                    self.flips.reset();
                }
                self.displayed_deck = Some(deck_id);
                self.dirty.sidebar = true;
                self.dirty.grid = true;
                self.dirty.search = true;
            }
            RegistryEvent::CardAdded { .. } | RegistryEvent::CardUpdated { .. } => {
                self.dirty.sidebar |= matches!(event, RegistryEvent::CardAdded { .. });
                self.dirty.grid |= displayed;
                self.dirty.search |= displayed;
                self.study_stale |= studied;
            }
            RegistryEvent::CardDeleted { card, .. } => {
                self.flips.clear_card(&card.id);
                self.dirty.sidebar = true;
                self.dirty.grid |= displayed;
                self.dirty.search |= displayed;
                self.study_stale |= studied;
            }
        }

        self.persist_requested = true;
        tracing::trace!(event = event.kind().as_str(), dirty = ?self.dirty, "views invalidated");
    }

    /// Returns and clears the dirty set.
    pub fn take_dirty(&mut self) -> DirtyViews {
        std::mem::take(&mut self.dirty)
    }
}

impl ViewCoordinator {
    /// Computes a renderable view model for a pane of `rows` × `cols`.
    ///
    /// The sidebar and grid are windowed so the focused item stays visible.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let document = self.document();
        let registry = self.registry();
        let selected = registry.selected_deck_id();

        let header = HeaderInfo {
            title: "Flashdeck".to_string(),
            subtitle: registry.get_selected().map_or_else(
                || format!("{} decks", registry.deck_count()),
                |deck| format!("{} · {} cards", deck.name, deck.len()),
            ),
        };

        let footer = FooterInfo {
            keybindings: self.input_mode().hints().to_string(),
            status: self.status().map(ToString::to_string),
        };

        let studyable = registry.get_selected().is_some_and(|deck| !deck.is_empty());
        let toolbar = [
            (Target::NewDeck, "+ New deck", true),
            (Target::AddCard, "+ Add card", selected.is_some()),
            (Target::Study, "Study", studyable),
        ]
        .into_iter()
        .map(|(target, label, is_enabled)| ToolbarButton {
            label,
            is_focused: document.is_focused(&target.element_id()),
            is_enabled,
        })
        .collect();

        let body_rows = rows.saturating_sub(10).max(1);

        let decks: Vec<DeckItem> = registry
            .decks()
            .iter()
            .map(|deck| DeckItem {
                name: deck.name.clone(),
                card_count: deck.len(),
                is_selected: selected == Some(deck.id),
                is_focused: document.is_focused(&Target::Deck(deck.id).element_id()),
            })
            .collect();
        let decks = window_around(decks, body_rows, |d| d.is_focused || d.is_selected);

        let query = self.search_query();
        let cards: Vec<CardItem> = self
            .visible_cards()
            .into_iter()
            .map(|card| {
                let flipped = self.is_card_flipped(&card.id);
                CardItem {
                    text: if flipped { card.back.clone() } else { card.front.clone() },
                    is_flipped: flipped,
                    is_focused: document.is_focused(&Target::Card(card.id.clone()).element_id()),
                    highlight_ranges: highlight_ranges(
                        if flipped { &card.back } else { &card.front },
                        query,
                    ),
                }
            })
            .collect();
        let cards = window_around(cards, body_rows, |c| c.is_focused);

        let search_bar = SearchBarInfo {
            query: query.to_string(),
            is_focused: document.is_focused(&Target::Search.element_id()),
            match_count: (!query.trim().is_empty()).then(|| self.visible_cards().len()),
        };

        let study = self.study().current_card().map(|card| {
            let (index, total) = self.study().position();
            let flipped = self.study().is_flipped();
            StudyView {
                deck_name: self
                    .study()
                    .deck_id()
                    .and_then(|id| registry.get_by_id(id))
                    .map(|d| d.name)
                    .unwrap_or_default(),
                position: index + 1,
                total,
                side_label: if flipped { "back" } else { "front" },
                text: if flipped { card.back.clone() } else { card.front.clone() },
            }
        });

        let modal = self.prompt().map(|prompt| {
            let focused = document.focused();
            let is = |id: &str| focused.as_ref().is_some_and(|f| f.as_str() == id);
            ModalView {
                title: prompt.title.clone(),
                value: prompt.value.clone(),
                show_input: prompt.kind.takes_text(),
                focused_control: [MODAL_CLOSE, MODAL_INPUT, MODAL_CANCEL, MODAL_CONFIRM]
                    .into_iter()
                    .find(|id| is(id))
                    .map(ToString::to_string),
            }
        });

        let empty_state = if registry.deck_count() == 0 {
            Some(EmptyState {
                message: "No decks yet".to_string(),
                subtitle: "Press n to create your first deck".to_string(),
            })
        } else if selected.is_none() {
            Some(EmptyState {
                message: "No deck selected".to_string(),
                subtitle: "Use ↑/↓ or Enter on a deck to open it".to_string(),
            })
        } else {
            None
        };

        tracing::trace!(rows = rows, cols = cols, "viewmodel computed");

        UIViewModel {
            header,
            toolbar,
            decks,
            cards,
            search_bar,
            study,
            modal,
            empty_state,
            footer,
        }
    }
}

/// Keeps at most `limit` items, centred on the first item matching `anchor`.
fn window_around<T>(items: Vec<T>, limit: usize, anchor: impl Fn(&T) -> bool) -> Vec<T> {
    if items.len() <= limit {
        return items;
    }
    let center = items.iter().position(anchor).unwrap_or(0);
    let start = center
        .saturating_sub(limit / 2)
        .min(items.len() - limit);
    items.into_iter().skip(start).take(limit).collect()
}

/// Character ranges of case-insensitive occurrences of `query` in `text`.
fn highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let haystack: Vec<char> = text.to_lowercase().chars().collect();
    if haystack.len() != text.chars().count() {
        // Case folding changed the length; highlighting would be misaligned.
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == needle[..] {
            ranges.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, Deck};
    use chrono::Utc;

    fn deck(id: u64) -> Deck {
        Deck::new(id, format!("deck {id}"), Utc::now())
    }

    #[test]
    fn card_events_only_touch_the_grid_of_the_displayed_deck() {
        let mut tracker = ViewTracker {
            displayed_deck: Some(1),
            ..ViewTracker::default()
        };
        let card = Card::new("hola".into(), "hello".into(), Utc::now());

        tracker.observe(&RegistryEvent::CardAdded {
            deck: deck(2),
            card: card.clone(),
        });
        let dirty = tracker.take_dirty();
        assert!(dirty.sidebar);
        assert!(!dirty.grid);
        assert!(tracker.persist_requested);

        tracker.observe(&RegistryEvent::CardAdded { deck: deck(1), card });
        assert!(tracker.take_dirty().grid);
        assert!(tracker.take_dirty().is_empty());
    }

    #[test]
    fn switching_decks_resets_grid_flips() {
        let mut tracker = ViewTracker::default();
        let card = Card::new("a".into(), "b".into(), Utc::now());

        tracker.observe(&RegistryEvent::DeckSelected(deck(1)));
        tracker.flips.toggle(&card.id);
        tracker.observe(&RegistryEvent::DeckSelected(deck(1)));
        assert!(tracker.flips.is_flipped(&card.id));

        tracker.observe(&RegistryEvent::DeckSelected(deck(2)));
        assert!(!tracker.flips.is_flipped(&card.id));
        assert_eq!(tracker.displayed_deck, Some(2));
    }

    #[test]
    fn deleting_the_displayed_deck_clears_it() {
        let mut tracker = ViewTracker {
            displayed_deck: Some(3),
            studied_deck: Some(3),
            ..ViewTracker::default()
        };
        tracker.observe(&RegistryEvent::DeckDeleted(deck(3)));
        assert_eq!(tracker.displayed_deck, None);
        assert!(tracker.study_stale);
        assert!(tracker.take_dirty().grid);
    }

    #[test]
    fn highlights_are_case_insensitive() {
        assert_eq!(highlight_ranges("Hola hola", "HOLA"), vec![(0, 4), (5, 9)]);
        assert!(highlight_ranges("hola", "  ").is_empty());
    }

    #[test]
    fn window_keeps_anchor_visible() {
        let items: Vec<usize> = (0..20).collect();
        let visible = window_around(items, 5, |i| *i == 18);
        assert_eq!(visible, vec![15, 16, 17, 18, 19]);
    }
}
