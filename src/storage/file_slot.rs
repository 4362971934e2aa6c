//! File-backed slot storage.
//!
//! Each slot is a JSON file `<dir>/<slot>.json`. Writes go to a temporary file
//! first and are then renamed over the target, so a crash mid-write leaves the
//! previous value intact and a slot never holds a partial payload.

use super::backend::{KeyValueStore, SlotError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Slot store rooted at a directory on disk.
///
/// # Examples
///
/// ```no_run
/// use flashdeck::storage::{FileSlotStore, KeyValueStore};
/// use std::path::PathBuf;
///
/// let mut store = FileSlotStore::new(PathBuf::from("/tmp/flashdeck"));
/// store.set("flashdeck-state", "{}")?;
/// assert_eq!(store.get("flashdeck-state")?.as_deref(), Some("{}"));
/// # Ok::<(), flashdeck::storage::SlotError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileSlotStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on the
    /// first write.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            quota_bytes: None,
        }
    }

    /// Caps the size of any single slot.
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl KeyValueStore for FileSlotStore {
    fn get(&self, slot: &str) -> Result<Option<String>, SlotError> {
        let path = self.slot_path(slot);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::trace!(path = ?path, bytes = contents.len(), "slot read");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(SlotError::Unavailable(e.to_string()))
            }
            Err(e) => Err(SlotError::Io(e)),
        }
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<(), SlotError> {
        if let Some(limit) = self.quota_bytes {
            if value.len() > limit {
                return Err(SlotError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SlotError::Unavailable(format!("{}: {e}", self.dir.display())))?;

        let path = self.slot_path(slot);
        let tmp_path = path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, value)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), SlotError> {
        match std::fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SlotError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_slot_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path().to_path_buf());
        assert!(store.get("absent").unwrap().is_none());
    }

    #[test]
    fn writes_replace_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSlotStore::new(dir.path().join("nested"));

        store.set("slot", r#"{"a":1,"long":"xxxxxxxxxxxx"}"#).unwrap();
        store.set("slot", r#"{"b":2}"#).unwrap();

        assert_eq!(store.get("slot").unwrap().as_deref(), Some(r#"{"b":2}"#));
        assert!(!dir.path().join("nested").join("slot.tmp").exists());
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSlotStore::new(dir.path().to_path_buf()).with_quota(Some(4));

        let err = store.set("slot", "12345").unwrap_err();
        assert!(matches!(err, SlotError::QuotaExceeded { needed: 5, limit: 4 }));

        store.remove("slot").unwrap();
        store.remove("slot").unwrap();
    }
}
