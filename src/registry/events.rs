//! Typed mutation notifications and the synchronous event bus.
//!
//! Every successful registry mutation publishes exactly one [`RegistryEvent`].
//! The event set is closed, so subscribers that `match` on it get compile-time
//! exhaustiveness checking instead of comparing event-name strings.
//!
//! # Delivery
//!
//! - Synchronous: all listeners run before the mutating call returns.
//! - Ordered: listeners run in subscription order.
//! - Isolated: a listener that returns an error or panics is logged and
//!   skipped; the remaining listeners still run and the mutation still succeeds.

use crate::domain::{Card, Deck};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Discriminant of a [`RegistryEvent`], useful for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DeckCreated,
    DeckUpdated,
    DeckDeleted,
    DeckSelected,
    CardAdded,
    CardUpdated,
    CardDeleted,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeckCreated => "deckCreated",
            Self::DeckUpdated => "deckUpdated",
            Self::DeckDeleted => "deckDeleted",
            Self::DeckSelected => "deckSelected",
            Self::CardAdded => "cardAdded",
            Self::CardUpdated => "cardUpdated",
            Self::CardDeleted => "cardDeleted",
        }
    }
}

/// A mutation notification carrying owned copies of the affected entities.
///
/// Card events carry the deck *after* the mutation, so for `CardDeleted` the
/// deck no longer contains `card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    DeckCreated(Deck),
    DeckUpdated(Deck),
    DeckDeleted(Deck),
    DeckSelected(Deck),
    CardAdded { deck: Deck, card: Card },
    CardUpdated { deck: Deck, card: Card },
    CardDeleted { deck: Deck, card: Card },
}

impl RegistryEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::DeckCreated(_) => EventKind::DeckCreated,
            Self::DeckUpdated(_) => EventKind::DeckUpdated,
            Self::DeckDeleted(_) => EventKind::DeckDeleted,
            Self::DeckSelected(_) => EventKind::DeckSelected,
            Self::CardAdded { .. } => EventKind::CardAdded,
            Self::CardUpdated { .. } => EventKind::CardUpdated,
            Self::CardDeleted { .. } => EventKind::CardDeleted,
        }
    }

    /// The deck the event is about.
    #[must_use]
    pub const fn deck(&self) -> &Deck {
        match self {
            Self::DeckCreated(deck)
            | Self::DeckUpdated(deck)
            | Self::DeckDeleted(deck)
            | Self::DeckSelected(deck)
            | Self::CardAdded { deck, .. }
            | Self::CardUpdated { deck, .. }
            | Self::CardDeleted { deck, .. } => deck,
        }
    }

    /// The card the event is about, for card events.
    #[must_use]
    pub const fn card(&self) -> Option<&Card> {
        match self {
            Self::CardAdded { card, .. }
            | Self::CardUpdated { card, .. }
            | Self::CardDeleted { card, .. } => Some(card),
            _ => None,
        }
    }
}

/// Failure reported by a listener. Logged by the bus, never propagated.
#[derive(Debug, Error)]
#[error("listener failed: {0}")]
pub struct ListenerError(pub String);

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&RegistryEvent) -> Result<(), ListenerError>>;

/// Ordered list of listeners with per-listener failure isolation.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&RegistryEvent) -> Result<(), ListenerError> + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        tracing::debug!(subscription = id.0, total = self.listeners.len(), "listener subscribed");
        id
    }

    /// Removes a listener. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener in subscription order.
    ///
    /// Returns the number of listeners that completed without error.
    pub fn publish(&mut self, event: &RegistryEvent) -> usize {
        let _span = tracing::debug_span!(
            "publish",
            kind = event.kind().as_str(),
            deck_id = event.deck().id,
            listeners = self.listeners.len()
        )
        .entered();

        let mut delivered = 0;
        for (id, listener) in &mut self.listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    tracing::warn!(subscription = id.0, error = %e, "listener returned an error");
                }
                Err(_) => {
                    tracing::warn!(subscription = id.0, "listener panicked");
                }
            }
        }
        delivered
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
