//! Admin panel view — the Edited buffers as the editor shows them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::editor::{EditSession, Notification};
use crate::models::{ContactEntry, ContentMap, Experience};

#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub experiences: Vec<Experience>,
    pub content: ContentMap,
    pub contacts: Vec<ContactEntry>,
    pub pending_deletions: Vec<i64>,
    pub dirty: bool,
    pub notification: Option<Notification>,
}

pub fn render_admin_view(session: &EditSession, now: DateTime<Utc>) -> AdminView {
    AdminView {
        experiences: session.edited_experiences().to_vec(),
        content: session.edited_content().clone(),
        contacts: session.edited_contacts().to_vec(),
        pending_deletions: session.pending_deletions(),
        dirty: session.is_dirty(),
        notification: session.notification(now).cloned(),
    }
}
