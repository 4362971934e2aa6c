//! The deck registry: single owner of all decks, cards and the selection.
//!
//! All mutations validate their input, apply the change, and publish exactly
//! one [`RegistryEvent`] before returning. Reads hand out owned clones so that
//! callers can never corrupt registry state through a returned value.

use super::events::{EventBus, ListenerError, RegistryEvent, SubscriptionId};
use crate::domain::error::{FlashdeckError, Result};
use crate::domain::{Card, CardDraft, CardId, Deck, DeckPatch};
use crate::storage::Snapshot;
use chrono::Utc;

/// Owns deck/card collections, selection, id generation and notifications.
///
/// # Example
///
/// ```
/// use flashdeck::registry::DeckRegistry;
/// use flashdeck::domain::CardDraft;
///
/// let mut registry = DeckRegistry::new();
/// let deck = registry.create_deck("Spanish")?;
/// registry.add_card(deck.id, CardDraft::new("hola", "hello"))?;
///
/// let decks = registry.get_all();
/// assert_eq!(decks[0].cards.len(), 1);
/// # Ok::<(), flashdeck::FlashdeckError>(())
/// ```
#[derive(Debug)]
pub struct DeckRegistry {
    decks: Vec<Deck>,
    selected_deck_id: Option<u64>,
    next_deck_id: u64,
    bus: EventBus,
}

impl Default for DeckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckRegistry {
    /// Creates an empty registry whose first deck id will be 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decks: Vec::new(),
            selected_deck_id: None,
            next_deck_id: 1,
            bus: EventBus::new(),
        }
    }

    /// Rebuilds a registry from a loaded snapshot.
    ///
    /// The deck id counter continues past the highest id in the snapshot, and a
    /// selection that points at a missing deck is dropped.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let decks = snapshot.decks.clone();
        let next_deck_id = seed_next_id(decks.iter().map(|d| d.id));
        let selected_deck_id = snapshot
            .selected_deck_id
            .filter(|id| decks.iter().any(|d| d.id == *id));

        tracing::debug!(
            deck_count = decks.len(),
            next_deck_id = next_deck_id,
            selected = ?selected_deck_id,
            "registry restored from snapshot"
        );

        Self {
            decks,
            selected_deck_id,
            next_deck_id,
            bus: EventBus::new(),
        }
    }

    /// Captures the current state as a snapshot ready for persistence.
    #[must_use]
    pub fn to_snapshot(&self, search_query: &str) -> Snapshot {
        Snapshot {
            decks: self.decks.clone(),
            selected_deck_id: self.selected_deck_id,
            search_query: search_query.to_string(),
            ..Snapshot::default()
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&RegistryEvent) -> std::result::Result<(), ListenerError> + 'static,
    {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Creates a deck named `name` (trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] if the trimmed name is empty.
    pub fn create_deck(&mut self, name: &str) -> Result<Deck> {
        let name = validate_name(name)?;
        let deck = Deck::new(self.next_deck_id, name, Utc::now());
        self.next_deck_id += 1;
        self.decks.push(deck.clone());

        tracing::debug!(deck_id = deck.id, name = %deck.name, "deck created");
        self.bus.publish(&RegistryEvent::DeckCreated(deck.clone()));
        Ok(deck)
    }

    /// Renames a deck.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] for an empty name and
    /// [`FlashdeckError::DeckNotFound`] for an unknown id.
    pub fn update_deck(&mut self, id: u64, patch: DeckPatch) -> Result<Deck> {
        let name = validate_name(&patch.name)?;
        let deck = self.deck_mut(id)?;
        deck.name = name;
        let deck = deck.clone();

        tracing::debug!(deck_id = id, name = %deck.name, "deck renamed");
        self.bus.publish(&RegistryEvent::DeckUpdated(deck.clone()));
        Ok(deck)
    }

    /// Removes a deck and returns it.
    ///
    /// If the deck was selected, the selection is cleared before the
    /// `DeckDeleted` event goes out.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::DeckNotFound`] for an unknown id.
    pub fn delete_deck(&mut self, id: u64) -> Result<Deck> {
        let index = self
            .decks
            .iter()
            .position(|d| d.id == id)
            .ok_or(FlashdeckError::DeckNotFound(id))?;
        let deck = self.decks.remove(index);

        if self.selected_deck_id == Some(id) {
            self.selected_deck_id = None;
            tracing::debug!(deck_id = id, "selection cleared with deleted deck");
        }

        tracing::debug!(deck_id = id, card_count = deck.cards.len(), "deck deleted");
        self.bus.publish(&RegistryEvent::DeckDeleted(deck.clone()));
        Ok(deck)
    }

    /// Makes `id` the selected deck.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::DeckNotFound`] for an unknown id.
    pub fn select_deck(&mut self, id: u64) -> Result<Deck> {
        let deck = self.deck(id)?.clone();
        self.selected_deck_id = Some(id);

        tracing::debug!(deck_id = id, "deck selected");
        self.bus.publish(&RegistryEvent::DeckSelected(deck.clone()));
        Ok(deck)
    }

    /// Appends a card to a deck.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`] if both sides are blank and
    /// [`FlashdeckError::DeckNotFound`] for an unknown deck.
    pub fn add_card(&mut self, deck_id: u64, draft: CardDraft) -> Result<Card> {
        let (front, back) = validate_card(draft)?;
        let deck = self.deck_mut(deck_id)?;

        let now = Utc::now();
        let mut card = Card::new(front, back, now);
        while deck.contains_card(&card.id) {
            card.id = CardId::generate(now);
        }
        deck.cards.push(card.clone());
        let deck = deck.clone();

        tracing::debug!(deck_id = deck_id, card_id = %card.id, "card added");
        self.bus.publish(&RegistryEvent::CardAdded {
            deck,
            card: card.clone(),
        });
        Ok(card)
    }

    /// Removes a card from a deck and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::DeckNotFound`] or
    /// [`FlashdeckError::CardNotFound`].
    pub fn delete_card(&mut self, deck_id: u64, card_id: &CardId) -> Result<Card> {
        let deck = self.deck_mut(deck_id)?;
        let index = deck
            .card_index(card_id)
            .ok_or_else(|| card_not_found(deck_id, card_id))?;
        let card = deck.cards.remove(index);
        let deck = deck.clone();

        tracing::debug!(deck_id = deck_id, card_id = %card.id, "card deleted");
        self.bus.publish(&RegistryEvent::CardDeleted {
            deck,
            card: card.clone(),
        });
        Ok(card)
    }

    /// Replaces both sides of a card.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::Validation`], [`FlashdeckError::DeckNotFound`]
    /// or [`FlashdeckError::CardNotFound`].
    pub fn update_card(&mut self, deck_id: u64, card_id: &CardId, draft: CardDraft) -> Result<Card> {
        let (front, back) = validate_card(draft)?;
        let deck = self.deck_mut(deck_id)?;
        let index = deck
            .card_index(card_id)
            .ok_or_else(|| card_not_found(deck_id, card_id))?;

        let card = &mut deck.cards[index];
        card.front = front;
        card.back = back;
        let card = card.clone();
        let deck = deck.clone();

        tracing::debug!(deck_id = deck_id, card_id = %card.id, "card updated");
        self.bus.publish(&RegistryEvent::CardUpdated {
            deck,
            card: card.clone(),
        });
        Ok(card)
    }

    /// Returns an independent copy of every deck, in creation order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Deck> {
        self.decks.clone()
    }

    #[must_use]
    pub fn get_by_id(&self, id: u64) -> Option<Deck> {
        self.decks.iter().find(|d| d.id == id).cloned()
    }

    #[must_use]
    pub fn get_selected(&self) -> Option<Deck> {
        self.selected_deck_id.and_then(|id| self.get_by_id(id))
    }

    #[must_use]
    pub const fn selected_deck_id(&self) -> Option<u64> {
        self.selected_deck_id
    }

    #[must_use]
    pub fn deck_count(&self) -> usize {
        self.decks.len()
    }

    /// Borrowing view used by renderers that do not need owned copies.
    #[must_use]
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    fn deck(&self, id: u64) -> Result<&Deck> {
        self.decks
            .iter()
            .find(|d| d.id == id)
            .ok_or(FlashdeckError::DeckNotFound(id))
    }

    fn deck_mut(&mut self, id: u64) -> Result<&mut Deck> {
        self.decks
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(FlashdeckError::DeckNotFound(id))
    }
}

/// Next deck id after the highest id seen, or 1 when there are none.
#[must_use]
pub fn seed_next_id(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().max().map_or(1, |max| max.saturating_add(1))
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FlashdeckError::Validation(
            "deck name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_card(draft: CardDraft) -> Result<(String, String)> {
    if draft.front.trim().is_empty() && draft.back.trim().is_empty() {
        return Err(FlashdeckError::Validation(
            "card needs a front or a back".to_string(),
        ));
    }
    Ok((draft.front, draft.back))
}

fn card_not_found(deck_id: u64, card_id: &CardId) -> FlashdeckError {
    FlashdeckError::CardNotFound {
        deck_id,
        card_id: card_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EventKind;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn recorded(registry: &mut DeckRegistry) -> Rc<RefCell<Vec<RegistryEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        registry.subscribe(move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
        events
    }

    #[test]
    fn deck_ids_are_never_reused() {
        let mut registry = DeckRegistry::new();
        let a = registry.create_deck("A").unwrap();
        let b = registry.create_deck("B").unwrap();
        registry.delete_deck(b.id).unwrap();
        registry.delete_deck(a.id).unwrap();
        let c = registry.create_deck("C").unwrap();

        assert!(c.id > b.id);
        assert_ne!(c.id, a.id);
    }

    #[test]
    fn names_are_trimmed_and_validated() {
        let mut registry = DeckRegistry::new();
        assert!(matches!(
            registry.create_deck("   "),
            Err(FlashdeckError::Validation(_))
        ));

        let deck = registry.create_deck("  Spanish ").unwrap();
        assert_eq!(deck.name, "Spanish");

        assert!(matches!(
            registry.update_deck(deck.id, DeckPatch::rename("")),
            Err(FlashdeckError::Validation(_))
        ));
        assert!(matches!(
            registry.update_deck(99, DeckPatch::rename("x")),
            Err(FlashdeckError::DeckNotFound(99))
        ));
    }

    #[test]
    fn each_mutation_publishes_exactly_one_event() {
        let mut registry = DeckRegistry::new();
        let events = recorded(&mut registry);

        let deck = registry.create_deck("Spanish").unwrap();
        registry.select_deck(deck.id).unwrap();
        let card = registry
            .add_card(deck.id, CardDraft::new("hola", "hello"))
            .unwrap();
        registry
            .update_card(deck.id, &card.id, CardDraft::new("hola", "hi"))
            .unwrap();
        registry.delete_card(deck.id, &card.id).unwrap();
        registry.update_deck(deck.id, DeckPatch::rename("Español")).unwrap();
        registry.delete_deck(deck.id).unwrap();

        let kinds: Vec<EventKind> = events.borrow().iter().map(RegistryEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::DeckCreated,
                EventKind::DeckSelected,
                EventKind::CardAdded,
                EventKind::CardUpdated,
                EventKind::CardDeleted,
                EventKind::DeckUpdated,
                EventKind::DeckDeleted,
            ]
        );
    }

    #[test]
    fn failed_mutations_publish_nothing() {
        let mut registry = DeckRegistry::new();
        let events = recorded(&mut registry);

        let _ = registry.create_deck("");
        let _ = registry.delete_deck(5);
        let _ = registry.select_deck(5);
        let _ = registry.add_card(5, CardDraft::new("a", "b"));

        assert!(events.borrow().is_empty());
    }

    #[test]
    fn deleting_selected_deck_clears_selection_before_publishing() {
        let registry = Rc::new(RefCell::new(DeckRegistry::new()));
        let deck = registry.borrow_mut().create_deck("Spanish").unwrap();
        registry.borrow_mut().select_deck(deck.id).unwrap();

        let seen = Rc::new(RefCell::new(None));
        {
            let seen = Rc::clone(&seen);
            registry.borrow_mut().subscribe(move |event| {
                if let RegistryEvent::DeckDeleted(deleted) = event {
                    *seen.borrow_mut() = Some(deleted.clone());
                }
                Ok(())
            });
        }

        let removed = registry.borrow_mut().delete_deck(deck.id).unwrap();
        assert_eq!(registry.borrow().selected_deck_id(), None);
        assert!(registry.borrow().get_selected().is_none());
        assert_eq!(seen.borrow().as_ref(), Some(&removed));
        assert_eq!(removed.name, "Spanish");
    }

    #[test]
    fn card_ids_stay_unique_across_add_and_delete() {
        let mut registry = DeckRegistry::new();
        let deck = registry.create_deck("Numbers").unwrap();
        let mut seen = HashSet::new();

        for round in 0..20 {
            let card = registry
                .add_card(deck.id, CardDraft::new(format!("q{round}"), "a"))
                .unwrap();
            assert!(seen.insert(card.id.clone()), "duplicate id {}", card.id);
            if round % 3 == 0 {
                registry.delete_card(deck.id, &card.id).unwrap();
            }
        }
    }

    #[test]
    fn get_all_returns_independent_copies() {
        let mut registry = DeckRegistry::new();
        let deck = registry.create_deck("Spanish").unwrap();
        registry.add_card(deck.id, CardDraft::new("hola", "hello")).unwrap();

        let mut copy = registry.get_all();
        copy[0].name = "Mutated".into();
        copy[0].cards.clear();
        copy.clear();

        let fresh = registry.get_all();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].name, "Spanish");
        assert_eq!(fresh[0].cards.len(), 1);
    }

    #[test]
    fn blank_cards_are_rejected() {
        let mut registry = DeckRegistry::new();
        let deck = registry.create_deck("Spanish").unwrap();
        assert!(matches!(
            registry.add_card(deck.id, CardDraft::new(" ", "")),
            Err(FlashdeckError::Validation(_))
        ));
        assert!(matches!(
            registry.delete_card(deck.id, &CardId::from("nope")),
            Err(FlashdeckError::CardNotFound { .. })
        ));
    }

    #[test]
    fn restored_registry_continues_id_sequence() {
        let now = Utc::now();
        let snapshot = Snapshot {
            decks: vec![Deck::new(4, "A".into(), now), Deck::new(9, "B".into(), now)],
            selected_deck_id: Some(42),
            ..Snapshot::default()
        };

        let mut registry = DeckRegistry::from_snapshot(&snapshot);
        assert_eq!(registry.selected_deck_id(), None);
        assert_eq!(registry.create_deck("C").unwrap().id, 10);
    }

    #[test]
    fn seed_defaults_to_one() {
        assert_eq!(seed_next_id(Vec::new()), 1);
        assert_eq!(seed_next_id(vec![3, 7, 5]), 8);
    }
}
