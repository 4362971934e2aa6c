//! Keyboard input: host-independent keys and the key-ownership stack.
//!
//! Components that take over the keyboard (the modal focus trap, study mode)
//! acquire a token from the [`KeyDispatcher`] and must release exactly that
//! token when they let go. Only the most recent owner receives keys.

pub mod dispatcher;
pub mod keys;

pub use dispatcher::{KeyDispatcher, KeyOwner, KeyToken};
pub use keys::{Key, KeyDisposition};
