//! View model types representing renderable UI state.
//!
//! View models are computed by `ViewCoordinator::compute_viewmodel` and
//! consumed by the renderer. They hold display-ready data only: text already
//! chosen for the visible side of a card, highlight ranges already computed,
//! lists already windowed to the pane height.
//!
//! # Example
//!
//! ```rust
//! use flashdeck::ui::viewmodel::{CardItem, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: "Flashdeck".into(), subtitle: "Spanish · 1 cards".into() },
//!     toolbar: vec![],
//!     decks: vec![],
//!     cards: vec![CardItem {
//!         text: "hola".into(),
//!         is_flipped: false,
//!         is_focused: true,
//!         highlight_ranges: vec![(0, 2)],
//!     }],
//!     search_bar: SearchBarInfo { query: "ho".into(), is_focused: false, match_count: Some(1) },
//!     study: None,
//!     modal: None,
//!     empty_state: None,
//!     footer: FooterInfo { keybindings: "q: quit".into(), status: None },
//! };
//! assert_eq!(vm.cards.len(), 1);
//! ```

/// Complete UI view model for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    /// New deck, add card and study buttons.
    pub toolbar: Vec<ToolbarButton>,
    /// Deck list for the sidebar.
    pub decks: Vec<DeckItem>,
    /// Card grid of the selected deck, narrowed by search.
    pub cards: Vec<CardItem>,
    pub search_bar: SearchBarInfo,
    /// Present while study mode is on; replaces the card grid.
    pub study: Option<StudyView>,
    /// Present while a prompt is open; drawn above everything else.
    pub modal: Option<ModalView>,
    /// Shown in place of the grid when there is nothing to display.
    pub empty_state: Option<EmptyState>,
    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Selected deck summary or deck count.
    pub subtitle: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding hints for the current input mode.
    pub keybindings: String,
    /// Last status message, such as a rejected input or a study summary.
    pub status: Option<String>,
}

/// A toolbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub label: &'static str,
    pub is_focused: bool,
    pub is_enabled: bool,
}

/// One row of the deck sidebar.
#[derive(Debug, Clone)]
pub struct DeckItem {
    pub name: String,
    pub card_count: usize,
    pub is_selected: bool,
    pub is_focused: bool,
}

/// One card of the grid.
#[derive(Debug, Clone)]
pub struct CardItem {
    /// Text of the visible side.
    pub text: String,
    pub is_flipped: bool,
    pub is_focused: bool,
    /// Character ranges matching the search query, `(start, end)` exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Search field display information.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    pub query: String,
    pub is_focused: bool,
    /// Number of matching cards when a query is active.
    pub match_count: Option<usize>,
}

/// The study overlay.
#[derive(Debug, Clone)]
pub struct StudyView {
    pub deck_name: String,
    /// One-based position of the current card.
    pub position: usize,
    pub total: usize,
    /// `"front"` or `"back"`.
    pub side_label: &'static str,
    pub text: String,
}

/// The prompt modal.
#[derive(Debug, Clone)]
pub struct ModalView {
    pub title: String,
    pub value: String,
    /// Confirmation prompts have no text field.
    pub show_input: bool,
    /// Id of the focused modal control, if any.
    pub focused_control: Option<String>,
}

/// Empty state message.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
