//! Transient per-card "showing the back" state.
//!
//! Flip state belongs to a view, not to the deck registry. It is never
//! persisted and must be reset explicitly whenever the set of cards on screen
//! changes (deck switch, card deletion, study navigation).

use super::deck::CardId;
use std::collections::HashMap;

/// Mapping from card id to whether the card currently shows its back side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlipState {
    flipped: HashMap<CardId, bool>,
}

impl FlipState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles the card and returns the new value.
    pub fn toggle(&mut self, card_id: &CardId) -> bool {
        let entry = self.flipped.entry(card_id.clone()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    #[must_use]
    pub fn is_flipped(&self, card_id: &CardId) -> bool {
        self.flipped.get(card_id).copied().unwrap_or(false)
    }

    /// Forgets the state of a single card.
    pub fn clear_card(&mut self, card_id: &CardId) {
        self.flipped.remove(card_id);
    }

    /// Forgets everything.
    pub fn reset(&mut self) {
        self.flipped.clear();
    }

    #[must_use]
    pub fn flipped_count(&self) -> usize {
        self.flipped.values().filter(|v| **v).count()
    }
}
