//! Table store — the backend collaborator holding the three site tables.
//!
//! `AppState` carries an `Arc<dyn TableStore>`: `PgTableStore` in production,
//! `InMemoryTableStore` for local development and tests.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{ContactEntry, ContentKey, ContentRow, ExperienceRow, NewExperience};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTableStore;
pub use postgres::PgTableStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Experiences,
    ContactInfo,
    Content,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Experiences => "experiences",
            Table::ContactInfo => "contact_info",
            Table::Content => "content",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{table} rejected the request: {message}")]
    Rejected { table: Table, message: String },
}

/// Select/insert/upsert access to the `experiences`, `contact_info` and
/// `content` tables. Every upsert is atomic per row only.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// All experiences, ordered by `order_index` ascending.
    async fn fetch_experiences(&self) -> Result<Vec<ExperienceRow>, StoreError>;

    /// Inserts a new experience and returns it with its assigned identity.
    async fn insert_experience(&self, experience: NewExperience)
        -> Result<ExperienceRow, StoreError>;

    async fn upsert_experience(&self, row: &ExperienceRow) -> Result<(), StoreError>;

    async fn delete_experience(&self, id: i64) -> Result<(), StoreError>;

    async fn fetch_contacts(&self) -> Result<Vec<ContactEntry>, StoreError>;

    async fn upsert_contact(&self, contact: &ContactEntry) -> Result<(), StoreError>;

    async fn fetch_content(&self) -> Result<Vec<ContentRow>, StoreError>;

    /// The (key, language) pairs currently stored, without their values.
    async fn fetch_content_keys(&self) -> Result<Vec<ContentKey>, StoreError>;

    async fn upsert_content(&self, rows: &[ContentRow]) -> Result<(), StoreError>;
}
