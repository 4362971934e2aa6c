//! Focusable element inventory of the rendered view.
//!
//! The terminal has no DOM, so the [`Document`] keeps the list of elements the
//! renderer draws, in drawing order, together with which one has focus. The
//! modal region is a fixed set of four controls appended after the main view:
//!
//! ```text
//! main:  new-deck  search  deck-1 … deck-N  add-card  study  card-… card-…
//! modal: close  input  cancel  confirm
//! ```
//!
//! Moving focus with Tab when no trap intercepts the key is the document's own
//! "native" behaviour, implemented by [`Document::native_tab`].

use crate::domain::CardId;
use crate::focus::{Element, ElementId, ElementKind, FocusHost, Visibility};

pub const MODAL_CLOSE: &str = "close";
pub const MODAL_INPUT: &str = "input";
pub const MODAL_CANCEL: &str = "cancel";
pub const MODAL_CONFIRM: &str = "confirm";

/// What a main-view element stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    NewDeck,
    Search,
    Deck(u64),
    AddCard,
    Study,
    Card(CardId),
}

impl Target {
    #[must_use]
    pub fn element_id(&self) -> ElementId {
        match self {
            Self::NewDeck => ElementId::from("new-deck"),
            Self::Search => ElementId::from("search"),
            Self::Deck(id) => ElementId::new(format!("deck-{id}")),
            Self::AddCard => ElementId::from("add-card"),
            Self::Study => ElementId::from("study"),
            Self::Card(id) => ElementId::new(format!("card-{id}")),
        }
    }

    /// Maps an element id back to its target. Modal controls have none.
    #[must_use]
    pub fn parse(id: &ElementId) -> Option<Self> {
        let raw = id.as_str();
        match raw {
            "new-deck" => return Some(Self::NewDeck),
            "search" => return Some(Self::Search),
            "add-card" => return Some(Self::AddCard),
            "study" => return Some(Self::Study),
            _ => {}
        }
        if let Some(deck) = raw.strip_prefix("deck-") {
            return deck.parse().ok().map(Self::Deck);
        }
        raw.strip_prefix("card-")
            .map(|card| Self::Card(CardId::from(card)))
    }

    fn kind(&self) -> ElementKind {
        match self {
            Self::Search => ElementKind::TextInput,
            _ => ElementKind::Button,
        }
    }

    /// Builds the element for this target.
    #[must_use]
    pub fn element(&self, disabled: bool) -> Element {
        Element {
            id: self.element_id(),
            kind: self.kind(),
            disabled,
            tab_index: None,
            visibility: Visibility::VISIBLE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    main: Vec<Element>,
    modal: Vec<Element>,
    modal_visible: bool,
    input_visible: bool,
    focused: Option<ElementId>,
    container_focused: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self {
            main: Vec::new(),
            modal: vec![
                Element::new(MODAL_CLOSE, ElementKind::Button),
                Element::new(MODAL_INPUT, ElementKind::TextInput),
                Element::new(MODAL_CANCEL, ElementKind::Button),
                Element::new(MODAL_CONFIRM, ElementKind::Button),
            ],
            modal_visible: false,
            input_visible: true,
            focused: None,
            container_focused: false,
        }
    }

    /// Replaces the main-view inventory.
    ///
    /// If the focused element disappeared, focus is dropped, as a browser does
    /// when the focused node is removed.
    pub fn set_main(&mut self, elements: Vec<Element>) {
        self.main = elements;
        if let Some(focused) = &self.focused {
            let attached = self.main.iter().chain(&self.modal).any(|e| &e.id == focused);
            if !attached {
                tracing::trace!(element = %focused, "focused element removed");
                self.focused = None;
            }
        }
    }

    /// Shows or hides the modal text field (confirmation prompts hide it).
    pub fn set_input_visible(&mut self, visible: bool) {
        self.input_visible = visible;
    }

    #[must_use]
    pub const fn modal_visible(&self) -> bool {
        self.modal_visible
    }

    #[must_use]
    pub fn is_focused(&self, id: &ElementId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    #[must_use]
    pub fn focused_target(&self) -> Option<Target> {
        self.focused.as_ref().and_then(Target::parse)
    }

    #[must_use]
    pub const fn container_focused(&self) -> bool {
        self.container_focused
    }

    /// Drops focus entirely.
    pub fn blur(&mut self) {
        self.focused = None;
        self.container_focused = false;
    }

    fn modal_visibility(&self, element: &Element) -> Visibility {
        if !self.modal_visible || (element.id.as_str() == MODAL_INPUT && !self.input_visible) {
            Visibility::NOT_DISPLAYED
        } else {
            Visibility::VISIBLE
        }
    }

    fn modal_elements(&self) -> Vec<Element> {
        self.modal
            .iter()
            .map(|e| e.clone().with_visibility(self.modal_visibility(e)))
            .collect()
    }

    /// Every element in document order with its current visibility.
    #[must_use]
    pub fn elements(&self) -> Vec<Element> {
        let mut all = self.main.clone();
        all.extend(self.modal_elements());
        all
    }

    /// Moves focus to the next (or previous) focusable element in document
    /// order, wrapping at the ends.
    pub fn native_tab(&mut self, backwards: bool) {
        let order: Vec<ElementId> = self
            .elements()
            .into_iter()
            .filter(Element::is_focusable)
            .map(|e| e.id)
            .collect();
        if order.is_empty() {
            return;
        }

        let len = order.len();
        let position = self
            .focused
            .as_ref()
            .and_then(|id| order.iter().position(|candidate| candidate == id));
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
        };
        self.focus(&order[next]);
    }
}

impl FocusHost for Document {
    fn contained_elements(&self) -> Vec<Element> {
        self.modal_elements()
    }

    fn focused(&self) -> Option<ElementId> {
        self.focused.clone()
    }

    fn focus(&mut self, id: &ElementId) {
        self.focused = Some(id.clone());
        self.container_focused = false;
    }

    fn focus_container(&mut self) {
        self.focused = None;
        self.container_focused = true;
    }

    fn can_receive_focus(&self, id: &ElementId) -> bool {
        self.elements().iter().any(|e| &e.id == id && e.is_focusable())
    }

    fn show_region(&mut self) {
        self.modal_visible = true;
    }

    fn hide_region(&mut self) {
        self.modal_visible = false;
        self.container_focused = false;
        let inside = self
            .focused
            .as_ref()
            .is_some_and(|id| self.modal.iter().any(|e| &e.id == id));
        if inside {
            self.focused = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        let mut doc = Document::new();
        doc.set_main(vec![
            Target::NewDeck.element(false),
            Target::Search.element(false),
            Target::Deck(1).element(false),
            Target::Study.element(true),
        ]);
        doc
    }

    #[test]
    fn targets_round_trip_through_element_ids() {
        let card = CardId::from("card-abc-12345678");
        for target in [Target::NewDeck, Target::Deck(42), Target::Card(card)] {
            assert_eq!(Target::parse(&target.element_id()), Some(target));
        }
        assert_eq!(Target::parse(&ElementId::from(MODAL_CONFIRM)), None);
    }

    #[test]
    fn native_tab_skips_disabled_and_hidden_modal() {
        let mut doc = document();
        doc.native_tab(false);
        assert_eq!(doc.focused_target(), Some(Target::NewDeck));
        doc.native_tab(false);
        doc.native_tab(false);
        assert_eq!(doc.focused_target(), Some(Target::Deck(1)));
        doc.native_tab(false);
        assert_eq!(doc.focused_target(), Some(Target::NewDeck));
        doc.native_tab(true);
        assert_eq!(doc.focused_target(), Some(Target::Deck(1)));
    }

    #[test]
    fn modal_controls_follow_region_visibility() {
        let mut doc = document();
        assert!(doc.contained_elements().iter().all(|e| !e.is_focusable()));

        doc.show_region();
        assert_eq!(doc.contained_elements().iter().filter(|e| e.is_focusable()).count(), 4);

        doc.set_input_visible(false);
        assert!(!doc.can_receive_focus(&ElementId::from(MODAL_INPUT)));
    }

    #[test]
    fn hiding_the_region_drops_focus_inside_it() {
        let mut doc = document();
        doc.show_region();
        doc.focus(&ElementId::from(MODAL_INPUT));
        doc.hide_region();
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn removing_the_focused_element_drops_focus() {
        let mut doc = document();
        doc.focus(&Target::Deck(1).element_id());
        doc.set_main(vec![Target::NewDeck.element(false)]);
        assert_eq!(doc.focused(), None);
    }
}
