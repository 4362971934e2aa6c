//! Debounced card search.
//!
//! Filtering is view-only: it never touches the registry, and the filtered
//! list is handed to a callback once the typing has settled.

pub mod index;

pub use index::{filter_cards, SearchIndex, DEFAULT_DEBOUNCE_MS};
