//! Admin edit session — the Original/Edited buffers behind the admin panel.
//!
//! Original mirrors the last known server state and is only replaced
//! wholesale by a successful save or a reload. Every user edit touches the
//! Edited copy; experience edits are mirrored into the draft store.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::draft::DraftStore;
use crate::models::{content_map_from_rows, ContactEntry, ContactPatch, ContentMap, Experience};
use crate::store::{StoreError, TableStore};

pub mod content;
pub mod experiences;
pub mod save;

pub use experiences::Direction;
pub use save::{SaveError, SaveReport};

/// How long the "saved" notification stays visible.
pub const NOTIFICATION_TTL_SECS: i64 = 3;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Experience {0} not found")]
    ExperienceNotFound(i64),

    #[error("Contact {0} not found")]
    ContactNotFound(i64),

    #[error("Failed to add experience: {0}")]
    Insert(#[source] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn saved(now: DateTime<Utc>) -> Self {
        Self {
            message: "Changes saved successfully!".to_string(),
            expires_at: now + Duration::seconds(NOTIFICATION_TTL_SECS),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub struct EditSession {
    original_experiences: Vec<Experience>,
    edited_experiences: Vec<Experience>,
    original_contacts: Vec<ContactEntry>,
    edited_contacts: Vec<ContactEntry>,
    original_content: ContentMap,
    edited_content: ContentMap,
    /// Rows created by `add` since the last load or save. They exist
    /// server-side but are not part of Original.
    inserted: BTreeSet<i64>,
    notification: Option<Notification>,
    drafts: Arc<dyn DraftStore>,
}

impl EditSession {
    pub fn new(drafts: Arc<dyn DraftStore>) -> Self {
        Self {
            original_experiences: Vec::new(),
            edited_experiences: Vec::new(),
            original_contacts: Vec::new(),
            edited_contacts: Vec::new(),
            original_content: ContentMap::new(),
            edited_content: ContentMap::new(),
            inserted: BTreeSet::new(),
            notification: None,
            drafts,
        }
    }

    /// Fetches all three collections and resets both buffers to them.
    ///
    /// A failed fetch is logged and leaves that collection as it was. When
    /// the experience list comes back non-empty a stored draft, if any,
    /// replaces the Edited experiences.
    pub async fn load(&mut self, store: &dyn TableStore) {
        match store.fetch_experiences().await {
            Ok(rows) => {
                let experiences: Vec<Experience> = rows.into_iter().map(Experience::from).collect();
                self.original_experiences = experiences.clone();
                self.edited_experiences = experiences;
                self.inserted.clear();
                if !self.original_experiences.is_empty() {
                    self.hydrate_from_draft();
                }
            }
            Err(e) => error!("Error fetching experiences: {e}"),
        }

        match store.fetch_contacts().await {
            Ok(contacts) => {
                self.original_contacts = contacts.clone();
                self.edited_contacts = contacts;
            }
            Err(e) => error!("Error fetching contact info: {e}"),
        }

        match store.fetch_content().await {
            Ok(rows) => {
                let content = content_map_from_rows(rows);
                self.original_content = content.clone();
                self.edited_content = content;
            }
            Err(e) => error!("Error fetching content: {e}"),
        }

        info!(
            "Edit session loaded: {} experiences, {} contacts, {} content keys",
            self.edited_experiences.len(),
            self.edited_contacts.len(),
            self.edited_content.len()
        );
    }

    fn hydrate_from_draft(&mut self) {
        match self.drafts.load() {
            Ok(Some(draft)) => {
                info!("Restoring {} experiences from draft", draft.len());
                self.edited_experiences = draft;
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable draft: {e}"),
        }
    }

    /// Mirrors the Edited experiences into the draft store.
    fn persist_draft(&self) {
        if let Err(e) = self.drafts.save(&self.edited_experiences) {
            warn!("Failed to write draft: {e}");
        }
    }

    fn clear_draft(&self) {
        if let Err(e) = self.drafts.clear() {
            warn!("Failed to clear draft: {e}");
        }
    }

    #[cfg(test)]
    pub fn original_experiences(&self) -> &[Experience] {
        &self.original_experiences
    }

    pub fn edited_experiences(&self) -> &[Experience] {
        &self.edited_experiences
    }

    #[cfg(test)]
    pub fn original_contacts(&self) -> &[ContactEntry] {
        &self.original_contacts
    }

    pub fn edited_contacts(&self) -> &[ContactEntry] {
        &self.edited_contacts
    }

    #[cfg(test)]
    pub fn original_content(&self) -> &ContentMap {
        &self.original_content
    }

    pub fn edited_content(&self) -> &ContentMap {
        &self.edited_content
    }

    /// Experience ids that exist server-side but are no longer edited.
    pub fn pending_deletions(&self) -> Vec<i64> {
        let kept: BTreeSet<i64> = self.edited_experiences.iter().map(|e| e.id).collect();
        self.original_experiences
            .iter()
            .map(|e| e.id)
            .chain(self.inserted.iter().copied())
            .filter(|id| !kept.contains(id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.edited_experiences != self.original_experiences
            || self.edited_contacts != self.original_contacts
            || self.edited_content != self.original_content
            || !self.pending_deletions().is_empty()
    }

    pub fn update_contact(&mut self, id: i64, patch: ContactPatch) -> Result<(), EditorError> {
        let contact = self
            .edited_contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EditorError::ContactNotFound(id))?;
        contact.apply(patch);
        Ok(())
    }

    /// Resets every Edited buffer to Original and clears the draft.
    ///
    /// Rows created by `add` since the last save are deleted server-side
    /// right away. A row whose delete fails stays pending and is removed by
    /// the next successful save.
    pub async fn discard(&mut self, store: &dyn TableStore) {
        let inserted: Vec<i64> = self.inserted.iter().copied().collect();
        for id in inserted {
            match store.delete_experience(id).await {
                Ok(()) => {
                    self.inserted.remove(&id);
                }
                Err(e) => error!("Error deleting discarded experience {id}: {e}"),
            }
        }

        self.edited_content = self.original_content.clone();
        self.edited_experiences = self.original_experiences.clone();
        self.edited_contacts = self.original_contacts.clone();
        self.clear_draft();
        info!("Discarded unsaved changes");
    }

    /// The save notification, while it is still visible.
    pub fn notification(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_active(now))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::draft::MemoryDraftStore;
    use crate::models::{ExperienceRow, LocalizedField};
    use crate::store::InMemoryTableStore;

    pub fn localized(nl: &str, en: &str) -> LocalizedField {
        [("nl", nl), ("en", en)].into_iter().collect()
    }

    pub fn experience_row(id: i64, order_index: i32, title: &str) -> ExperienceRow {
        ExperienceRow {
            id,
            title: localized(title, title).to_column(),
            company: localized("", "").to_column(),
            period: localized("", "").to_column(),
            description: localized("", "").to_column(),
            order_index,
        }
    }

    pub fn contact(id: i64, kind: &str, value: &str) -> ContactEntry {
        ContactEntry {
            id,
            kind: kind.to_string(),
            value: value.to_string(),
            label: kind.to_string(),
        }
    }

    /// A store with three experiences, two contacts and an intro.
    pub fn seeded_store() -> Arc<InMemoryTableStore> {
        let store = Arc::new(InMemoryTableStore::new());
        store.seed_experience(experience_row(1, 0, "first"));
        store.seed_experience(experience_row(2, 1, "second"));
        store.seed_experience(experience_row(3, 2, "third"));
        store.seed_contact(contact(1, "phone", "+31 6 00000000"));
        store.seed_contact(contact(2, "email", "jan@example.com"));
        store.seed_content("intro", "nl", "A");
        store.seed_content("intro", "en", "B");
        store
    }

    pub async fn loaded_session(
        store: &InMemoryTableStore,
    ) -> (EditSession, Arc<MemoryDraftStore>) {
        let drafts = Arc::new(MemoryDraftStore::new());
        let mut session = EditSession::new(drafts.clone());
        session.load(store).await;
        (session, drafts)
    }

    pub fn ids(list: &[Experience]) -> Vec<i64> {
        list.iter().map(|e| e.id).collect()
    }

    pub fn order(list: &[Experience]) -> Vec<i32> {
        list.iter().map(|e| e.order_index).collect()
    }
}
