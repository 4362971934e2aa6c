//! Persisted snapshot format.
//!
//! The snapshot is the complete application state written to the storage slot
//! after every mutation.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 2,
//!   "decks": [
//!     {
//!       "id": 1,
//!       "name": "Spanish",
//!       "cards": [
//!         {
//!           "id": "card-lx3k9a1b-4f2a9c1e",
//!           "front": "hola",
//!           "back": "hello",
//!           "createdAt": "2026-10-17T09:30:00Z"
//!         }
//!       ],
//!       "createdAt": "2026-10-17T09:29:00Z"
//!     }
//!   ],
//!   "selectedDeckId": 1,
//!   "searchQuery": "",
//!   "savedAt": "2026-10-17T09:31:00Z"
//! }
//! ```

use crate::domain::Deck;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written by this build. Older payloads are migrated up to it.
pub const CURRENT_VERSION: u32 = 2;

/// Complete serialized application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub selected_deck_id: Option<u64>,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            decks: Vec::new(),
            selected_deck_id: None,
            search_query: String::new(),
            saved_at: None,
        }
    }
}

impl Snapshot {
    /// Total number of cards across all decks.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.decks.iter().map(|d| d.cards.len()).sum()
    }
}

/// Structural checks applied to a raw payload before migration.
///
/// `decks` must be an array and `selectedDeckId`, when present, must be null
/// or an integer.
///
/// # Errors
///
/// Returns a description of the first violated rule.
pub fn validate(raw: &Value) -> Result<(), String> {
    let Some(object) = raw.as_object() else {
        return Err("snapshot is not a JSON object".to_string());
    };

    match object.get("decks") {
        Some(Value::Array(_)) => {}
        Some(_) => return Err("decks is not an array".to_string()),
        None => return Err("decks is missing".to_string()),
    }

    match object.get("selectedDeckId") {
        None | Some(Value::Null) => {}
        Some(v) if v.is_i64() || v.is_u64() => {}
        Some(_) => return Err("selectedDeckId is neither null nor an integer".to_string()),
    }

    Ok(())
}
