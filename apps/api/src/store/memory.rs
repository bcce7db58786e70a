use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{ContactEntry, ContentKey, ContentRow, ExperienceRow, NewExperience};
use crate::store::{StoreError, Table, TableStore};

/// A write the in-memory store accepted, in arrival order.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    InsertExperience(i64),
    UpsertExperience(i64),
    DeleteExperience(i64),
    UpsertContact(i64),
    UpsertContent(ContentKey),
}

#[derive(Default)]
struct Tables {
    experiences: BTreeMap<i64, ExperienceRow>,
    contacts: BTreeMap<i64, ContactEntry>,
    content: BTreeMap<ContentKey, String>,
    next_experience_id: i64,
    failing: HashSet<Table>,
    #[cfg(test)]
    writes: Vec<WriteOp>,
}

impl Tables {
    fn check(&self, table: Table) -> Result<(), StoreError> {
        if self.failing.contains(&table) {
            return Err(StoreError::Rejected {
                table,
                message: format!("{table} is unavailable"),
            });
        }
        Ok(())
    }
}

/// `TableStore` held entirely in process memory.
///
/// Used when no database is configured, and by tests, which can make a
/// table reject every request and inspect the writes that landed.
#[derive(Default)]
pub struct InMemoryTableStore {
    tables: Mutex<Tables>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl InMemoryTableStore {

    pub fn seed_experience(&self, row: ExperienceRow) {
        let mut tables = self.lock();
        tables.next_experience_id = tables.next_experience_id.max(row.id);
        tables.experiences.insert(row.id, row);
    }

    pub fn seed_contact(&self, contact: ContactEntry) {
        self.lock().contacts.insert(contact.id, contact);
    }

    pub fn seed_content(&self, key: &str, language: &str, value: &str) {
        self.lock().content.insert(
            ContentKey {
                key: key.to_string(),
                language: language.to_string(),
            },
            value.to_string(),
        );
    }

    /// Makes every request against `table` fail until cleared.
    pub fn set_failing(&self, table: Table, failing: bool) {
        let mut tables = self.lock();
        if failing {
            tables.failing.insert(table);
        } else {
            tables.failing.remove(&table);
        }
    }

    pub fn writes(&self) -> Vec<WriteOp> {
        self.lock().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.lock().writes.clear();
    }

    pub fn experience(&self, id: i64) -> Option<ExperienceRow> {
        self.lock().experiences.get(&id).cloned()
    }

    pub fn contact(&self, id: i64) -> Option<ContactEntry> {
        self.lock().contacts.get(&id).cloned()
    }

    pub fn content_value(&self, key: &str, language: &str) -> Option<String> {
        self.lock()
            .content
            .get(&ContentKey {
                key: key.to_string(),
                language: language.to_string(),
            })
            .cloned()
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn fetch_experiences(&self) -> Result<Vec<ExperienceRow>, StoreError> {
        let tables = self.lock();
        tables.check(Table::Experiences)?;
        let mut rows: Vec<_> = tables.experiences.values().cloned().collect();
        rows.sort_by_key(|r| r.order_index);
        Ok(rows)
    }

    async fn insert_experience(
        &self,
        experience: NewExperience,
    ) -> Result<ExperienceRow, StoreError> {
        let mut tables = self.lock();
        tables.check(Table::Experiences)?;
        tables.next_experience_id += 1;
        let id = tables.next_experience_id;
        let row = experience.into_row(id);
        tables.experiences.insert(id, row.clone());
        #[cfg(test)]
        tables.writes.push(WriteOp::InsertExperience(id));
        Ok(row)
    }

    async fn upsert_experience(&self, row: &ExperienceRow) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.check(Table::Experiences)?;
        tables.next_experience_id = tables.next_experience_id.max(row.id);
        tables.experiences.insert(row.id, row.clone());
        #[cfg(test)]
        tables.writes.push(WriteOp::UpsertExperience(row.id));
        Ok(())
    }

    async fn delete_experience(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.check(Table::Experiences)?;
        tables.experiences.remove(&id);
        #[cfg(test)]
        tables.writes.push(WriteOp::DeleteExperience(id));
        Ok(())
    }

    async fn fetch_contacts(&self) -> Result<Vec<ContactEntry>, StoreError> {
        let tables = self.lock();
        tables.check(Table::ContactInfo)?;
        Ok(tables.contacts.values().cloned().collect())
    }

    async fn upsert_contact(&self, contact: &ContactEntry) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.check(Table::ContactInfo)?;
        tables.contacts.insert(contact.id, contact.clone());
        #[cfg(test)]
        tables.writes.push(WriteOp::UpsertContact(contact.id));
        Ok(())
    }

    async fn fetch_content(&self) -> Result<Vec<ContentRow>, StoreError> {
        let tables = self.lock();
        tables.check(Table::Content)?;
        Ok(tables
            .content
            .iter()
            .map(|(k, value)| ContentRow {
                key: k.key.clone(),
                language: k.language.clone(),
                value: value.clone(),
            })
            .collect())
    }

    async fn fetch_content_keys(&self) -> Result<Vec<ContentKey>, StoreError> {
        let tables = self.lock();
        tables.check(Table::Content)?;
        Ok(tables.content.keys().cloned().collect())
    }

    async fn upsert_content(&self, rows: &[ContentRow]) -> Result<(), StoreError> {
        let mut tables = self.lock();
        tables.check(Table::Content)?;
        for row in rows {
            let key = ContentKey {
                key: row.key.clone(),
                language: row.language.clone(),
            };
            tables.content.insert(key.clone(), row.value.clone());
            #[cfg(test)]
            tables.writes.push(WriteOp::UpsertContent(key));
        }
        Ok(())
    }
}
