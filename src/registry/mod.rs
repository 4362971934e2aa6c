//! Deck registry and its mutation-notification channel.
//!
//! # Modules
//!
//! - [`deck_registry`]: Owner of decks, cards and selection
//! - [`events`]: Typed event enum and the synchronous event bus

pub mod deck_registry;
pub mod events;

pub use deck_registry::{seed_next_id, DeckRegistry};
pub use events::{EventBus, EventKind, ListenerError, RegistryEvent, SubscriptionId};
