//! Error types for the flashdeck plugin.
//!
//! This module defines the centralized error type [`FlashdeckError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Errors fall into three groups:
//!
//! - **User-facing**: [`FlashdeckError::Validation`] and [`FlashdeckError::EmptyDeck`]
//!   are expected conditions that are shown to the user as a status message.
//! - **Stale references**: [`FlashdeckError::DeckNotFound`] and
//!   [`FlashdeckError::CardNotFound`] point at a logic bug (an id that no longer
//!   exists) and are logged rather than retried.
//! - **Infrastructure**: storage, I/O, JSON, theme and configuration failures.

use thiserror::Error;

/// The main error type for flashdeck operations.
///
/// # Examples
///
/// ```
/// use flashdeck::FlashdeckError;
///
/// let err = FlashdeckError::Validation("deck name must not be empty".to_string());
/// assert!(err.is_user_facing());
///
/// let err = FlashdeckError::DeckNotFound(7);
/// assert!(!err.is_user_facing());
/// ```
#[derive(Debug, Error)]
pub enum FlashdeckError {
    /// User-supplied input was rejected (empty name, blank card).
    #[error("{0}")]
    Validation(String),

    /// No deck with the given id exists.
    #[error("deck {0} not found")]
    DeckNotFound(u64),

    /// No card with the given id exists in the given deck.
    #[error("card {card_id} not found in deck {deck_id}")]
    CardNotFound {
        /// Deck that was searched.
        deck_id: u64,
        /// Card id that was not found.
        card_id: String,
    },

    /// Study mode was requested for a deck without cards.
    #[error("deck {0} has no cards to study")]
    EmptyDeck(u64),

    /// Storage operation failed.
    ///
    /// Only surfaces from the raw storage backends; the persistent store
    /// recovers from these locally.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FlashdeckError {
    /// Returns `true` for expected conditions that should be shown to the user
    /// as a message instead of being treated as a bug.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::EmptyDeck(_))
    }

    /// Returns `true` when the error stems from a stale deck or card id.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DeckNotFound(_) | Self::CardNotFound { .. })
    }
}

/// A specialized `Result` type for flashdeck operations.
pub type Result<T> = std::result::Result<T, FlashdeckError>;
