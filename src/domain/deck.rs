//! Deck and card domain models.
//!
//! A [`Deck`] is a named, ordered collection of [`Card`]s. Decks are owned by the
//! deck registry; everything handed out to callers is an owned clone, so
//! mutating a returned value never reaches back into registry state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Globally unique card identifier.
///
/// Generated from the creation timestamp plus random entropy, never from the
/// card's position in its deck: positions shift on deletion, ids must not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Generates a fresh id of the form `card-<millis base36>-<8 hex chars>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flashdeck::domain::CardId;
    ///
    /// let now = chrono::Utc::now();
    /// let a = CardId::generate(now);
    /// let b = CardId::generate(now);
    /// assert_ne!(a, b);
    /// assert!(a.as_str().starts_with("card-"));
    /// ```
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let entropy = Uuid::new_v4().simple().to_string();
        Self(format!("card-{}-{}", to_base36(millis), &entropy[..8]))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// A front/back text pair belonging to exactly one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Creates a card with a freshly generated id.
    #[must_use]
    pub fn new(front: String, back: String, now: DateTime<Utc>) -> Self {
        Self {
            id: CardId::generate(now),
            front,
            back,
            created_at: now,
        }
    }

    /// Case-folded substring match against either side of the card.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.front.to_lowercase().contains(needle) || self.back.to_lowercase().contains(needle)
    }
}

/// A named collection of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    /// Creates an empty deck.
    #[must_use]
    pub const fn new(id: u64, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            cards: Vec::new(),
            created_at,
        }
    }

    /// Position of the card with `card_id`, if present.
    #[must_use]
    pub fn card_index(&self, card_id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == card_id)
    }

    /// Looks up a card by id.
    #[must_use]
    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == card_id)
    }

    /// Returns `true` if any card in the deck already uses `card_id`.
    #[must_use]
    pub fn contains_card(&self, card_id: &CardId) -> bool {
        self.card_index(card_id).is_some()
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Changes accepted by `update_deck`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckPatch {
    pub name: String,
}

impl DeckPatch {
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Card contents accepted by `add_card` and `update_card`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

impl CardDraft {
    #[must_use]
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn card_match_is_case_insensitive_on_both_sides() {
        let card = Card::new("Hola".into(), "Hello".into(), Utc::now());
        assert!(card.matches("hol"));
        assert!(card.matches("ello"));
        assert!(!card.matches("adios"));
    }

    #[test]
    fn deck_lookup_by_card_id() {
        let now = Utc::now();
        let mut deck = Deck::new(1, "Spanish".into(), now);
        let card = Card::new("uno".into(), "one".into(), now);
        let id = card.id.clone();
        deck.cards.push(card);

        assert_eq!(deck.card_index(&id), Some(0));
        assert!(deck.contains_card(&id));
        assert!(deck.card(&CardId::from("missing")).is_none());
    }
}
