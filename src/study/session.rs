//! Study mode: one card at a time, flipped and stepped through with the
//! keyboard, with a summary of the session on exit.

use crate::domain::error::{FlashdeckError, Result};
use crate::domain::{Card, CardId, Deck, FlipState};
use crate::input::{Key, KeyDispatcher, KeyDisposition, KeyOwner, KeyToken};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Figures reported when a study session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudySummary {
    /// Distinct cards shown during the session.
    pub cards_visited: usize,
    pub elapsed_seconds: i64,
}

/// Navigation state machine over one deck's cards.
///
/// The session works on a copy of the deck's cards taken at [`enter`], so it
/// lives independently of the registry. The coordinator calls [`refresh`]
/// when the studied deck changes underneath it.
///
/// [`enter`]: StudySession::enter
/// [`refresh`]: StudySession::refresh
///
/// # Examples
///
/// ```
/// use flashdeck::domain::{Card, Deck};
/// use flashdeck::input::KeyDispatcher;
/// use flashdeck::study::StudySession;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let mut deck = Deck::new(1, "Spanish".into(), now);
/// deck.cards.push(Card::new("hola".into(), "hello".into(), now));
/// deck.cards.push(Card::new("gato".into(), "cat".into(), now));
///
/// let mut keys = KeyDispatcher::new();
/// let mut session = StudySession::new();
/// session.enter(&deck, &mut keys, now)?;
///
/// session.previous();
/// assert_eq!(session.position(), (1, 2));
///
/// let summary = session.exit(&mut keys, now).unwrap();
/// assert_eq!(summary.cards_visited, 2);
/// # Ok::<(), flashdeck::FlashdeckError>(())
/// ```
#[derive(Debug, Default)]
pub struct StudySession {
    active: bool,
    deck_id: Option<u64>,
    cards: Vec<Card>,
    current_index: usize,
    started_at: Option<DateTime<Utc>>,
    visited: HashSet<CardId>,
    flips: FlipState,
    token: Option<KeyToken>,
}

impl StudySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts studying `deck` from its first card.
    ///
    /// An active session is ended first, releasing its key ownership.
    ///
    /// # Errors
    ///
    /// Returns [`FlashdeckError::EmptyDeck`] if the deck has no cards. The
    /// previous session, if any, has still been ended.
    pub fn enter(&mut self, deck: &Deck, dispatcher: &mut KeyDispatcher, now: DateTime<Utc>) -> Result<()> {
        let _span = tracing::debug_span!("study_enter", deck_id = deck.id).entered();

        if self.active {
            tracing::debug!("study already active, ending previous session");
            let _ = self.exit(dispatcher, now);
        }

        let Some(first) = deck.cards.first() else {
            return Err(FlashdeckError::EmptyDeck(deck.id));
        };

        self.visited.clear();
        self.visited.insert(first.id.clone());
        self.cards.clone_from(&deck.cards);
        self.deck_id = Some(deck.id);
        self.current_index = 0;
        self.started_at = Some(now);
        self.flips.reset();
        self.active = true;
        self.token = Some(dispatcher.acquire(KeyOwner::Study));

        tracing::info!(deck_id = deck.id, card_count = self.cards.len(), "study session started");
        Ok(())
    }

    /// Moves to the following card, wrapping to the first.
    pub fn next(&mut self) {
        self.step(|i, n| (i + 1) % n);
    }

    /// Moves to the preceding card, wrapping to the last.
    pub fn previous(&mut self) {
        self.step(|i, n| (i + n - 1) % n);
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) {
        if !self.active || self.cards.is_empty() {
            return;
        }
        let n = self.cards.len();
        if self.current_index >= n {
            self.current_index = 0;
        }

        let leaving = self.cards[self.current_index].id.clone();
        self.flips.clear_card(&leaving);

        self.current_index = advance(self.current_index, n);
        let arriving = self.cards[self.current_index].id.clone();
        self.visited.insert(arriving);

        tracing::trace!(index = self.current_index, total = n, "study position changed");
    }

    /// Flips the current card. Returns the new state.
    pub fn toggle_flip(&mut self) -> bool {
        if !self.active {
            return false;
        }
        match self.cards.get(self.current_index) {
            Some(card) => self.flips.toggle(&card.id),
            None => false,
        }
    }

    /// Ends the session and releases key ownership.
    ///
    /// Returns `None` if no session was active.
    pub fn exit(&mut self, dispatcher: &mut KeyDispatcher, now: DateTime<Utc>) -> Option<StudySummary> {
        if !self.active {
            return None;
        }

        let elapsed = self
            .started_at
            .map_or(0, |started| (now - started).num_seconds().max(0));
        let summary = StudySummary {
            cards_visited: self.visited_count(),
            elapsed_seconds: elapsed,
        };

        if let Some(token) = self.token.take() {
            dispatcher.release(token);
        }
        self.active = false;
        self.flips.reset();

        tracing::info!(
            deck_id = ?self.deck_id,
            cards_visited = summary.cards_visited,
            elapsed_seconds = summary.elapsed_seconds,
            "study session ended"
        );
        Some(summary)
    }

    /// Routes a key press while study mode owns the keyboard.
    ///
    /// Keys are ignored when the session is inactive or another owner sits
    /// above it on the dispatcher stack.
    pub fn handle_key(
        &mut self,
        dispatcher: &mut KeyDispatcher,
        key: Key,
        now: DateTime<Utc>,
    ) -> (KeyDisposition, Option<StudySummary>) {
        if !self.active || !self.token.as_ref().is_some_and(|t| dispatcher.is_active(t)) {
            return (KeyDisposition::Ignored, None);
        }

        match key {
            Key::Left => self.previous(),
            Key::Right => self.next(),
            Key::Space => {
                self.toggle_flip();
            }
            Key::Esc => return (KeyDisposition::PreventDefault, self.exit(dispatcher, now)),
            _ => return (KeyDisposition::Default, None),
        }
        (KeyDisposition::PreventDefault, None)
    }

    /// Picks up changes to the studied deck made while studying.
    ///
    /// Returns `false` when the deck no longer has cards; the caller should
    /// then end the session.
    pub fn refresh(&mut self, deck: &Deck) -> bool {
        if !self.active || self.deck_id != Some(deck.id) {
            return true;
        }
        let current = self.current_card().map(|c| c.id.clone());

        self.cards.clone_from(&deck.cards);
        for id in self.flips_to_drop() {
            self.flips.clear_card(&id);
        }
        if self.cards.is_empty() {
            return false;
        }

        match current.and_then(|id| deck.card_index(&id)) {
            Some(index) => self.current_index = index,
            None => {
                // The card on screen was removed: show the one that took its slot.
                self.current_index = self.current_index.min(self.cards.len() - 1);
                let arriving = self.cards[self.current_index].id.clone();
                self.visited.insert(arriving);
            }
        }
        true
    }

    fn flips_to_drop(&self) -> Vec<CardId> {
        self.visited
            .iter()
            .filter(|id| !self.cards.iter().any(|c| &c.id == *id))
            .cloned()
            .collect()
    }

    /// The card on screen. `None` when inactive.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        if !self.active {
            return None;
        }
        self.cards.get(self.current_index)
    }

    /// Zero-based index and card count.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.current_index, self.cards.len())
    }

    /// Whether the current card shows its back.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.current_card()
            .is_some_and(|card| self.flips.is_flipped(&card.id))
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn deck_id(&self) -> Option<u64> {
        if self.active {
            self.deck_id
        } else {
            None
        }
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn deck(fronts: &[&str]) -> Deck {
        let now = Utc::now();
        let mut deck = Deck::new(7, "Study".into(), now);
        for front in fronts {
            deck.cards.push(Card::new((*front).into(), format!("{front}-back"), now));
        }
        deck
    }

    fn front(session: &StudySession) -> &str {
        session.current_card().map_or("", |c| c.front.as_str())
    }

    #[test]
    fn empty_deck_is_rejected() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let err = session.enter(&deck(&[]), &mut keys, Utc::now()).unwrap_err();
        assert!(matches!(err, FlashdeckError::EmptyDeck(7)));
        assert!(!session.is_active());
        assert!(keys.is_empty());
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        session.enter(&deck(&["a", "b", "c"]), &mut keys, Utc::now()).unwrap();

        session.next();
        session.next();
        assert_eq!(front(&session), "c");
        session.next();
        assert_eq!(front(&session), "a");
        session.previous();
        assert_eq!(front(&session), "c");
    }

    #[test]
    fn next_then_previous_is_identity() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        session.enter(&deck(&["a", "b", "c", "d"]), &mut keys, Utc::now()).unwrap();
        session.next();

        let before = session.position();
        session.next();
        session.previous();
        assert_eq!(session.position(), before);
    }

    #[test]
    fn single_card_navigation_stays_put() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        session.enter(&deck(&["only"]), &mut keys, Utc::now()).unwrap();
        session.next();
        session.previous();
        assert_eq!(session.position(), (0, 1));
    }

    #[test]
    fn leaving_a_card_clears_its_flip() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        session.enter(&deck(&["a", "b"]), &mut keys, Utc::now()).unwrap();

        assert!(session.toggle_flip());
        assert!(session.is_flipped());
        session.next();
        assert!(!session.is_flipped());
        session.previous();
        assert!(!session.is_flipped());
    }

    #[test]
    fn exit_reports_summary_once() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let start = Utc::now();
        session.enter(&deck(&["a", "b", "c"]), &mut keys, start).unwrap();
        session.next();
        session.previous();

        let summary = session.exit(&mut keys, start + Duration::seconds(42)).unwrap();
        assert_eq!(
            summary,
            StudySummary {
                cards_visited: 2,
                elapsed_seconds: 42
            }
        );
        assert!(keys.is_empty());
        assert!(session.exit(&mut keys, start).is_none());
    }

    #[test]
    fn reentering_releases_previous_ownership() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let now = Utc::now();
        session.enter(&deck(&["a"]), &mut keys, now).unwrap();
        session.enter(&deck(&["b", "c"]), &mut keys, now).unwrap();

        assert_eq!(keys.depth(), 1);
        assert_eq!(front(&session), "b");
    }

    #[test]
    fn keys_after_exit_are_ignored() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let now = Utc::now();
        session.enter(&deck(&["a", "b"]), &mut keys, now).unwrap();

        let (disposition, summary) = session.handle_key(&mut keys, Key::Esc, now);
        assert_eq!(disposition, KeyDisposition::PreventDefault);
        assert!(summary.is_some());

        for key in [Key::Esc, Key::Right, Key::Space] {
            assert_eq!(session.handle_key(&mut keys, key, now), (KeyDisposition::Ignored, None));
        }
    }

    #[test]
    fn keys_route_to_navigation() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let now = Utc::now();
        session.enter(&deck(&["a", "b"]), &mut keys, now).unwrap();

        session.handle_key(&mut keys, Key::Right, now);
        assert_eq!(front(&session), "b");
        let (disposition, _) = session.handle_key(&mut keys, Key::Space, now);
        assert_eq!(disposition, KeyDisposition::PreventDefault);
        assert!(session.is_flipped());
        session.handle_key(&mut keys, Key::Left, now);
        assert_eq!(front(&session), "a");
    }

    #[test]
    fn buried_session_does_not_receive_keys() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let now = Utc::now();
        session.enter(&deck(&["a", "b"]), &mut keys, now).unwrap();

        let modal = keys.acquire(KeyOwner::FocusTrap);
        assert_eq!(session.handle_key(&mut keys, Key::Right, now).0, KeyDisposition::Ignored);
        keys.release(modal);
        assert_eq!(session.handle_key(&mut keys, Key::Right, now).0, KeyDisposition::PreventDefault);
    }

    #[test]
    fn refresh_follows_card_deletion() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let mut studied = deck(&["a", "b", "c"]);
        session.enter(&studied, &mut keys, Utc::now()).unwrap();
        session.next();
        session.next();

        studied.cards.remove(0);
        assert!(session.refresh(&studied));
        assert_eq!(front(&session), "c");
        assert_eq!(session.position(), (1, 2));

        studied.cards.clear();
        assert!(!session.refresh(&studied));
    }

    #[test]
    fn deleting_the_last_card_on_screen_steps_back() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let mut studied = deck(&["a", "b", "c"]);
        session.enter(&studied, &mut keys, Utc::now()).unwrap();
        session.next();
        session.next();

        studied.cards.remove(2);
        assert!(session.refresh(&studied));
        assert!(session.is_active());
        assert_eq!(session.position(), (1, 2));
        assert_eq!(front(&session), "b");
    }

    #[test]
    fn card_sliding_into_view_counts_as_visited() {
        let mut keys = KeyDispatcher::new();
        let mut session = StudySession::new();
        let mut studied = deck(&["a", "b", "c"]);
        session.enter(&studied, &mut keys, Utc::now()).unwrap();
        session.next();

        studied.cards.remove(1);
        assert!(session.refresh(&studied));
        assert_eq!(front(&session), "c");
        assert_eq!(session.visited_count(), 3);
    }
}
