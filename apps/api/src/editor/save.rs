//! Save orchestration.
//!
//! A save writes three batches concurrently: experiences (upserts plus
//! deletions of removed records), contacts, and the content diff. All
//! batches are awaited. Only when every batch succeeds does Edited become
//! Original; rows that landed before a failure are not rolled back.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::editor::content::diff_content_against;
use crate::editor::experiences::renumber;
use crate::editor::{EditSession, Notification};
use crate::models::{ContactEntry, ContentKey, ContentRow, ExperienceRow};
use crate::store::{StoreError, Table, TableStore};

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to save changes: {0}")]
    ContentLookup(#[source] StoreError),

    #[error("Failed to save changes: {message}")]
    Batch { table: Table, message: String },
}

/// Everything one save will write.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavePlan {
    pub experiences: Vec<ExperienceRow>,
    pub deletions: Vec<i64>,
    pub contacts: Vec<ContactEntry>,
    pub content: Vec<ContentRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    pub experiences_written: usize,
    pub experiences_deleted: usize,
    pub contacts_written: usize,
    pub content_written: usize,
    pub notification: Notification,
}

impl EditSession {
    /// Builds the write set against the server's current content keys.
    ///
    /// Every experience is written with `order_index` equal to its list
    /// position, whatever the record currently holds.
    pub fn plan_save(&self, existing: &HashSet<ContentKey>) -> SavePlan {
        let experiences = self
            .edited_experiences
            .iter()
            .enumerate()
            .map(|(index, experience)| ExperienceRow {
                order_index: index as i32,
                ..experience.to_row()
            })
            .collect();

        SavePlan {
            experiences,
            deletions: self.pending_deletions(),
            contacts: self.edited_contacts.clone(),
            content: diff_content_against(existing, &self.original_content, &self.edited_content),
        }
    }

    /// Writes the Edited state to `store`.
    ///
    /// On failure the Edited buffers and the draft are left exactly as they
    /// were so the save can be retried.
    pub async fn save(&mut self, store: Arc<dyn TableStore>) -> Result<SaveReport, SaveError> {
        // Read fresh so rows added out of band are not treated as new.
        let existing: HashSet<ContentKey> = store
            .fetch_content_keys()
            .await
            .map_err(|e| {
                error!("Error saving changes: {e}");
                SaveError::ContentLookup(e)
            })?
            .into_iter()
            .collect();

        let plan = self.plan_save(&existing);
        info!(
            "Saving {} experiences ({} deletions), {} contacts, {} content rows",
            plan.experiences.len(),
            plan.deletions.len(),
            plan.contacts.len(),
            plan.content.len()
        );

        let (experiences, contacts, content) = tokio::join!(
            run_experience_batch(store.clone(), &plan),
            run_contact_batch(store.clone(), &plan.contacts),
            store.upsert_content(&plan.content),
        );

        let failure = [
            experiences.err(),
            contacts.err(),
            content.err().map(|e| (Table::Content, e.to_string())),
        ]
        .into_iter()
        .flatten()
        .next();

        if let Some((table, message)) = failure {
            error!("Error saving changes to {table}: {message}");
            let message = if message.trim().is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            };
            return Err(SaveError::Batch { table, message });
        }

        renumber(&mut self.edited_experiences);
        self.original_experiences = self.edited_experiences.clone();
        self.original_contacts = self.edited_contacts.clone();
        self.original_content = self.edited_content.clone();
        self.inserted.clear();
        self.clear_draft();

        let notification = Notification::saved(Utc::now());
        self.notification = Some(notification.clone());
        info!("Changes saved");

        Ok(SaveReport {
            experiences_written: plan.experiences.len(),
            experiences_deleted: plan.deletions.len(),
            contacts_written: plan.contacts.len(),
            content_written: plan.content.len(),
            notification,
        })
    }
}

/// Upserts and deletions on `experiences`, one request per row.
async fn run_experience_batch(
    store: Arc<dyn TableStore>,
    plan: &SavePlan,
) -> Result<(), (Table, String)> {
    let mut tasks = JoinSet::new();
    for row in plan.experiences.iter().cloned() {
        let store = store.clone();
        tasks.spawn(async move { store.upsert_experience(&row).await });
    }
    for id in plan.deletions.iter().copied() {
        let store = store.clone();
        tasks.spawn(async move { store.delete_experience(id).await });
    }
    drain(tasks, Table::Experiences).await
}

async fn run_contact_batch(
    store: Arc<dyn TableStore>,
    contacts: &[ContactEntry],
) -> Result<(), (Table, String)> {
    let mut tasks = JoinSet::new();
    for contact in contacts.iter().cloned() {
        let store = store.clone();
        tasks.spawn(async move { store.upsert_contact(&contact).await });
    }
    drain(tasks, Table::ContactInfo).await
}

/// Waits for every task, reporting the first failure seen.
async fn drain(
    mut tasks: JoinSet<Result<(), StoreError>>,
    table: Table,
) -> Result<(), (Table, String)> {
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let message = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };
        first_error.get_or_insert((table, message));
    }
    match first_error {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}
