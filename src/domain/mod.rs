//! Domain layer for the flashdeck plugin.
//!
//! This module contains the core domain types, independent of Zellij-specific
//! APIs or infrastructure concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`deck`]: Deck and card models, ids, and mutation payloads
//! - [`flip`]: Transient per-card flip state owned by views
//!
//! # Examples
//!
//! ```
//! use flashdeck::domain::{Card, Deck};
//!
//! let now = chrono::Utc::now();
//! let mut deck = Deck::new(1, "Spanish".to_string(), now);
//! deck.cards.push(Card::new("hola".into(), "hello".into(), now));
//! assert_eq!(deck.len(), 1);
//! ```

pub mod deck;
pub mod error;
pub mod flip;

pub use deck::{Card, CardDraft, CardId, Deck, DeckPatch};
pub use error::{FlashdeckError, Result};
pub use flip::FlipState;
