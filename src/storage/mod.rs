//! Storage layer for the persisted application snapshot.
//!
//! The whole application state is one JSON document written to a named slot
//! after every mutation. Loading never fails: anything unreadable degrades to
//! an empty snapshot.
//!
//! # Modules
//!
//! - `backend`: Slot trait abstraction for backend implementations
//! - `file_slot`: One JSON file per slot with atomic replacement
//! - `memory`: In-process backend used by tests
//! - `snapshot`: The persisted document and its structural validation
//! - `migration`: Step-by-step upgrades of older snapshot versions
//! - `persistent`: Load/save policy on top of a backend

pub mod backend;
pub mod file_slot;
pub mod memory;
pub mod migration;
pub mod persistent;
pub mod snapshot;

pub use backend::{KeyValueStore, SlotError};
pub use file_slot::FileSlotStore;
pub use memory::MemoryStore;
pub use persistent::{PersistentStore, DEFAULT_MAX_SNAPSHOT_BYTES};
pub use snapshot::{Snapshot, CURRENT_VERSION};
