//! Draft store — the persisted copy of unsaved experience edits.
//!
//! The draft lives under one fixed slot name, has no versioning and no
//! expiry. It is written after every experience mutation, read when the
//! experience list is populated, and cleared on save or discard.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::models::Experience;

/// Well-known name of the draft slot.
pub const DRAFT_SLOT: &str = "editedExperiences";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Draft is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub trait DraftStore: Send + Sync {
    /// Returns the stored draft, or `None` if the slot is empty.
    fn load(&self) -> Result<Option<Vec<Experience>>, DraftError>;

    fn save(&self, experiences: &[Experience]) -> Result<(), DraftError>;

    fn clear(&self) -> Result<(), DraftError>;
}

/// Draft kept as a JSON file named after [`DRAFT_SLOT`] inside `dir`.
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DraftError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{DRAFT_SLOT}.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<Vec<Experience>>, DraftError> {
        let raw = match std::fs::read_to_string(self.path()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, experiences: &[Experience]) -> Result<(), DraftError> {
        let encoded = serde_json::to_vec(experiences)?;
        // Write beside the target and rename so a reader never sees half a draft.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path()).map_err(|e| e.error)?;
        debug!("Draft written ({} experiences)", experiences.len());
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Draft kept in process memory, encoded the same way as on disk.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryDraftStore {
    slot: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot contents, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn put_raw(&self, raw: impl Into<String>) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw.into());
    }
}

#[cfg(test)]
impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<Vec<Experience>>, DraftError> {
        match self.raw() {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, experiences: &[Experience]) -> Result<(), DraftError> {
        self.put_raw(serde_json::to_string(experiences)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocalizedField;

    fn sample() -> Vec<Experience> {
        vec![
            Experience {
                id: 4,
                title: [("nl", "Ontwikkelaar"), ("en", "Developer")]
                    .into_iter()
                    .collect(),
                company: [("nl", "Acme"), ("en", "Acme")].into_iter().collect(),
                period: [("nl", "2021 - heden"), ("en", "2021 - present")]
                    .into_iter()
                    .collect(),
                description: LocalizedField::empty(),
                order_index: 0,
            },
            Experience {
                id: 2,
                title: [("en", "Intern")].into_iter().collect(),
                company: LocalizedField::empty(),
                period: LocalizedField::empty(),
                description: [("en", "Coffee")].into_iter().collect(),
                order_index: 1,
            },
        ]
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path()).unwrap();
        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert!(store.path().is_file());
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_file_clear_removes_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path()).unwrap();
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_none());
        // Clearing an empty slot is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_corrupt_draft_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(DraftError::Parse(_))));
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryDraftStore::new();
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        store.clear().unwrap();
        assert!(store.raw().is_none());
    }
}
