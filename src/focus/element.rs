//! Elements of the rendered document as the focus trap sees them.

use std::fmt;

/// Stable identifier of a focusable element in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of control an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A link; only focusable when it points somewhere.
    Link { has_target: bool },
    Button,
    /// Single-line text entry.
    TextInput,
    /// Checkbox or radio style input.
    ChoiceInput,
    Select,
    /// Static content, focusable only with an explicit tab index.
    Static,
}

/// Rendering state relevant to focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub displayed: bool,
    pub hidden: bool,
    /// Whether the element currently occupies space in the layout.
    pub laid_out: bool,
}

impl Visibility {
    pub const VISIBLE: Self = Self {
        displayed: true,
        hidden: false,
        laid_out: true,
    };

    pub const NOT_DISPLAYED: Self = Self {
        displayed: false,
        hidden: false,
        laid_out: false,
    };

    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.displayed && !self.hidden && self.laid_out
    }
}

/// One element of the document as seen by focus management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub disabled: bool,
    pub tab_index: Option<i32>,
    pub visibility: Visibility,
}

impl Element {
    /// A visible, enabled element without an explicit tab index.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(id),
            kind,
            disabled: false,
            tab_index: None,
            visibility: Visibility::VISIBLE,
        }
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub const fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Whether the element can take keyboard focus at all, ignoring
    /// visibility.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        if let Some(index) = self.tab_index {
            if index >= 0 {
                return true;
            }
        }
        match self.kind {
            ElementKind::Link { has_target } => has_target,
            ElementKind::Button
            | ElementKind::TextInput
            | ElementKind::ChoiceInput
            | ElementKind::Select => !self.disabled,
            ElementKind::Static => false,
        }
    }

    #[must_use]
    pub const fn is_focusable(&self) -> bool {
        self.is_interactive() && self.visibility.is_visible()
    }

    #[must_use]
    pub const fn is_text_entry(&self) -> bool {
        matches!(self.kind, ElementKind::TextInput)
    }
}

/// Filters `elements` down to those that can receive focus right now,
/// keeping document order.
#[must_use]
pub fn focusable(elements: Vec<Element>) -> Vec<Element> {
    elements.into_iter().filter(Element::is_focusable).collect()
}
