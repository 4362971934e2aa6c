//! Text prompts shown in the modal region.
//!
//! A prompt collects one line of text. Submitting an empty line is a real
//! answer and distinct from cancelling, which is reported as
//! [`PromptOutcome::Cancelled`].

use crate::domain::CardId;

/// How a prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Submitted(String),
    Cancelled,
}

/// What the answer of a prompt is used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewDeck,
    RenameDeck(u64),
    /// First step of adding (`card_id: None`) or editing a card.
    CardFront {
        deck_id: u64,
        card_id: Option<CardId>,
    },
    /// Second step; carries the front collected in the first one.
    CardBack {
        deck_id: u64,
        card_id: Option<CardId>,
        front: String,
    },
    ConfirmDeleteDeck(u64),
    ConfirmDeleteCard { deck_id: u64, card_id: CardId },
}

impl PromptKind {
    /// Whether the prompt has a text field; confirmations do not.
    #[must_use]
    pub const fn takes_text(&self) -> bool {
        !matches!(self, Self::ConfirmDeleteDeck(_) | Self::ConfirmDeleteCard { .. })
    }
}

/// An open prompt: its purpose, its title, and the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub title: String,
    pub value: String,
}

impl Prompt {
    #[must_use]
    pub fn new(kind: PromptKind, title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            value: value.into(),
        }
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// Ends the prompt with its current text.
    #[must_use]
    pub fn submit(self) -> (PromptKind, PromptOutcome) {
        (self.kind, PromptOutcome::Submitted(self.value))
    }
}
