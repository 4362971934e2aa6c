//! Versioned snapshot persistence over a [`KeyValueStore`].

use super::backend::{KeyValueStore, SlotError};
use super::migration::{migrate, stored_version};
use super::snapshot::{validate, Snapshot, CURRENT_VERSION};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Default ceiling for a serialized snapshot.
pub const DEFAULT_MAX_SNAPSHOT_BYTES: usize = 4 * 1024 * 1024;

/// Loads and saves the application snapshot under a single slot.
///
/// Neither operation returns an error: a failed load yields the default
/// snapshot and a failed save reports `false`. Both outcomes are logged.
pub struct PersistentStore {
    backend: Box<dyn KeyValueStore>,
    slot: String,
    max_bytes: usize,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("slot", &self.slot)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

impl PersistentStore {
    #[must_use]
    pub fn new(backend: Box<dyn KeyValueStore>, slot: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            backend,
            slot: slot.into(),
            max_bytes,
        }
    }

    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Reads the stored snapshot, migrating it to [`CURRENT_VERSION`].
    #[must_use]
    pub fn load(&self) -> Snapshot {
        self.load_at(Utc::now())
    }

    /// [`load`](Self::load) with an explicit clock for timestamps filled in by
    /// migrations.
    #[must_use]
    pub fn load_at(&self, now: DateTime<Utc>) -> Snapshot {
        let _span = tracing::debug_span!("storage_load", slot = %self.slot).entered();

        let raw = match self.backend.get(&self.slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no stored snapshot, starting empty");
                return Snapshot::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "storage unavailable, starting empty");
                return Snapshot::default();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "stored snapshot is not valid JSON, starting empty");
                return Snapshot::default();
            }
        };

        if let Err(reason) = validate(&value) {
            tracing::warn!(reason = %reason, "stored snapshot failed validation, starting empty");
            return Snapshot::default();
        }

        let version = stored_version(&value);
        if version > CURRENT_VERSION {
            tracing::warn!(
                version = version,
                current = CURRENT_VERSION,
                "snapshot written by a newer build, reading it as current"
            );
        }
        let mut value = if version < CURRENT_VERSION {
            migrate(value, version, now)
        } else {
            value
        };
        drop_unusable_selection(&mut value);

        let mut snapshot: Snapshot = match serde_json::from_value(value) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "stored snapshot has an unexpected shape, starting empty");
                return Snapshot::default();
            }
        };

        if let Some(selected) = snapshot.selected_deck_id {
            if !snapshot.decks.iter().any(|d| d.id == selected) {
                tracing::debug!(selected = selected, "dropping selection of missing deck");
                snapshot.selected_deck_id = None;
            }
        }
        snapshot.version = CURRENT_VERSION;

        tracing::info!(
            decks = snapshot.decks.len(),
            cards = snapshot.card_count(),
            "snapshot loaded"
        );
        snapshot
    }

    /// Writes `snapshot`, stamping the version and save time on a copy.
    ///
    /// Returns `true` only when the backend confirmed the write.
    pub fn save(&mut self, snapshot: &Snapshot) -> bool {
        self.save_at(snapshot, Utc::now())
    }

    /// [`save`](Self::save) with an explicit clock.
    pub fn save_at(&mut self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        let _span = tracing::debug_span!("storage_save", slot = %self.slot).entered();

        let stamped = Snapshot {
            version: CURRENT_VERSION,
            saved_at: Some(now),
            ..snapshot.clone()
        };

        let payload = match serde_json::to_string(&stamped) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize snapshot");
                return false;
            }
        };

        if payload.len() > self.max_bytes {
            tracing::warn!(
                bytes = payload.len(),
                limit = self.max_bytes,
                "snapshot exceeds size ceiling, not saved"
            );
            return false;
        }

        match self.backend.set(&self.slot, &payload) {
            Ok(()) => {
                tracing::debug!(bytes = payload.len(), "snapshot saved");
                true
            }
            Err(SlotError::QuotaExceeded { needed, limit }) => {
                tracing::warn!(
                    needed = needed,
                    limit = limit,
                    "storage quota exceeded, clearing slot"
                );
                if let Err(e) = self.backend.remove(&self.slot) {
                    tracing::warn!(error = %e, "failed to clear slot after quota error");
                }
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save snapshot");
                false
            }
        }
    }
}

/// Nulls a `selectedDeckId` that cannot name a deck (negative or too
/// large), so only the selection is lost instead of the whole snapshot.
fn drop_unusable_selection(value: &mut Value) {
    let Some(selected) = value.get_mut("selectedDeckId") else {
        return;
    };
    if !selected.is_null() && !selected.is_u64() {
        tracing::debug!(selected = %selected, "dropping selection that is not a deck id");
        *selected = Value::Null;
    }
}
