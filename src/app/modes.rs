//! Input mode derived from who currently owns the keyboard.
//!
//! The mode is never stored: it is computed from the key dispatcher and the
//! document focus, so it cannot drift from the state that actually routes
//! keys. It drives the footer's keybinding hints and the plugin shim's
//! handling of `q`.

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating decks and cards.
    Normal,
    /// Typing into the search field.
    Search,
    /// A modal prompt owns the keyboard.
    Prompt,
    /// Study mode owns the keyboard.
    Study,
}

impl InputMode {
    /// Keybinding hints shown in the footer.
    #[must_use]
    pub const fn hints(self) -> &'static str {
        match self {
            Self::Normal => {
                "n: new deck | a: add card | e: edit | x: delete card | r: rename | d: delete deck | s: study | /: search | q: quit"
            }
            Self::Search => "type to filter | Enter/Esc: done",
            Self::Prompt => "Tab: next field | Enter: confirm | Esc: cancel",
            Self::Study => "←/→: previous/next | Space: flip | Esc: finish",
        }
    }
}
