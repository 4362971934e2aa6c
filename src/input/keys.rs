//! Decoded key presses and what a handler did with them.

/// A key press, already decoded from the host's key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    /// Shift+Tab.
    BackTab,
    Enter,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Space,
    Backspace,
    Char(char),
}

impl Key {
    /// Navigation keys that move focus between elements.
    #[must_use]
    pub const fn is_tab(self) -> bool {
        matches!(self, Self::Tab | Self::BackTab)
    }
}

/// What a key handler decided about a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Handled; the host must not apply its own behaviour.
    PreventDefault,
    /// Seen but not consumed; the host applies its native behaviour.
    Default,
    /// The handler was not active and did not look at the key.
    Ignored,
}

impl KeyDisposition {
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::PreventDefault)
    }
}
