//! Durable key-value slot abstraction.
//!
//! This module defines the [`KeyValueStore`] trait that abstracts over the
//! place snapshots are written to. The trait is deliberately tiny: the
//! persistent store only ever reads, replaces or clears one whole slot.
//!
//! # Implementations
//!
//! - [`FileSlotStore`](super::FileSlotStore): one JSON file per slot with atomic writes
//! - [`MemoryStore`](super::MemoryStore): in-process map, used by tests and as a fallback

use thiserror::Error;

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum SlotError {
    /// The backend cannot be used at all (missing directory, sandbox denied).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the backend's capacity.
    #[error("storage quota exceeded: {needed} bytes requested, {limit} allowed")]
    QuotaExceeded {
        /// Size of the rejected payload.
        needed: usize,
        /// Capacity of the backend.
        limit: usize,
    },

    /// Underlying I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A durable map from slot names to serialized payloads.
///
/// Every `set` replaces the slot's whole value; backends must never leave a
/// slot holding a mix of two writes.
pub trait KeyValueStore {
    /// Reads a slot. `Ok(None)` means the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or the read fails.
    fn get(&self, slot: &str) -> Result<Option<String>, SlotError>;

    /// Replaces the slot's value.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::QuotaExceeded`] when the payload does not fit, or
    /// another error if the write fails.
    fn set(&mut self, slot: &str, value: &str) -> Result<(), SlotError>;

    /// Clears the slot. Removing a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or the removal fails.
    fn remove(&mut self, slot: &str) -> Result<(), SlotError>;
}
