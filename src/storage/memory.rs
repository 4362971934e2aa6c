//! In-memory slot storage.
//!
//! Clones share the same underlying map, so a test can keep a handle to the
//! store it gave away and inspect or sabotage it afterwards.

use super::backend::{KeyValueStore, SlotError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
    writes: usize,
}

/// Shared in-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes larger than `quota_bytes` with [`SlotError::QuotaExceeded`].
    #[must_use]
    pub fn with_quota(self, quota_bytes: usize) -> Self {
        self.inner.borrow_mut().quota_bytes = Some(quota_bytes);
        self
    }

    /// Makes every operation fail with [`SlotError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    /// Writes a raw value, bypassing quota checks.
    pub fn put_raw(&self, slot: &str, value: &str) {
        self.inner
            .borrow_mut()
            .slots
            .insert(slot.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, slot: &str) -> Option<String> {
        self.inner.borrow().slots.get(slot).cloned()
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    fn check_available(&self) -> Result<(), SlotError> {
        if self.inner.borrow().unavailable {
            return Err(SlotError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>, SlotError> {
        self.check_available()?;
        Ok(self.raw(slot))
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<(), SlotError> {
        self.check_available()?;
        let mut inner = self.inner.borrow_mut();
        if let Some(limit) = inner.quota_bytes {
            if value.len() > limit {
                return Err(SlotError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }
        inner.slots.insert(slot.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), SlotError> {
        self.check_available()?;
        self.inner.borrow_mut().slots.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        store.set("slot", "value").unwrap();
        assert_eq!(handle.raw("slot").as_deref(), Some("value"));
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.get("slot"), Err(SlotError::Unavailable(_))));
        assert!(matches!(store.set("slot", "v"), Err(SlotError::Unavailable(_))));
    }
}
