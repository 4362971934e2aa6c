//! The key-ownership stack shared by the focus trap and study mode.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Who currently holds a key-ownership token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOwner {
    FocusTrap,
    Study,
}

impl fmt::Display for KeyOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FocusTrap => write!(f, "focus-trap"),
            Self::Study => write!(f, "study"),
        }
    }
}

/// Proof of key ownership, returned by [`KeyDispatcher::acquire`].
///
/// Tokens are not `Clone`: each acquisition is paired with one release.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyToken(u64);

#[derive(Debug, Default)]
struct Stack {
    owners: Vec<(u64, KeyOwner)>,
    next_token: u64,
}

/// Stack of key owners. The top of the stack receives keys.
///
/// Clones are handles onto the same stack, so a view can watch ownership
/// while a component holds the dispatcher mutably.
///
/// # Examples
///
/// ```
/// use flashdeck::input::{KeyDispatcher, KeyOwner};
///
/// let mut keys = KeyDispatcher::new();
/// let watcher = keys.clone();
/// let study = keys.acquire(KeyOwner::Study);
/// let modal = keys.acquire(KeyOwner::FocusTrap);
/// assert_eq!(watcher.active_owner(), Some(KeyOwner::FocusTrap));
///
/// keys.release(modal);
/// assert_eq!(keys.active_owner(), Some(KeyOwner::Study));
/// keys.release(study);
/// assert!(watcher.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyDispatcher {
    stack: Rc<RefCell<Stack>>,
}

impl KeyDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `owner` on top of the stack.
    pub fn acquire(&mut self, owner: KeyOwner) -> KeyToken {
        let mut stack = self.stack.borrow_mut();
        stack.next_token += 1;
        let id = stack.next_token;
        stack.owners.push((id, owner));
        tracing::trace!(owner = %owner, token = id, depth = stack.owners.len(), "key ownership acquired");
        KeyToken(id)
    }

    /// Removes the entry for `token`, wherever it sits in the stack.
    ///
    /// Returns `false` for a token that was already released.
    pub fn release(&mut self, token: KeyToken) -> bool {
        let mut stack = self.stack.borrow_mut();
        let Some(index) = stack.owners.iter().position(|(id, _)| *id == token.0) else {
            tracing::trace!(token = token.0, "stale key token ignored");
            return false;
        };
        let (_, owner) = stack.owners.remove(index);
        tracing::trace!(owner = %owner, token = token.0, depth = stack.owners.len(), "key ownership released");
        true
    }

    /// Returns `true` if `token` is the current top of the stack.
    #[must_use]
    pub fn is_active(&self, token: &KeyToken) -> bool {
        self.stack.borrow().owners.last().is_some_and(|(id, _)| *id == token.0)
    }

    #[must_use]
    pub fn active_owner(&self) -> Option<KeyOwner> {
        self.stack.borrow().owners.last().map(|(_, owner)| *owner)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.borrow().owners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.borrow().owners.is_empty()
    }
}
