use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::editor::{EditSession, EditorError};
use crate::models::{Experience, ExperienceField, NewExperience};
use crate::store::TableStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Rewrites every `order_index` to the record's position in `list`.
pub fn renumber(list: &mut [Experience]) {
    for (index, experience) in list.iter_mut().enumerate() {
        experience.order_index = index as i32;
    }
}

/// Swaps the record with its neighbour in `direction` and renumbers.
///
/// Returns `Ok(false)` and leaves the list untouched when the record is
/// already at that end of the list.
pub fn move_within(
    list: &mut [Experience],
    id: i64,
    direction: Direction,
) -> Result<bool, EditorError> {
    let index = list
        .iter()
        .position(|e| e.id == id)
        .ok_or(EditorError::ExperienceNotFound(id))?;

    let target = match direction {
        Direction::Up if index == 0 => return Ok(false),
        Direction::Down if index + 1 == list.len() => return Ok(false),
        Direction::Up => index - 1,
        Direction::Down => index + 1,
    };

    list.swap(index, target);
    renumber(list);
    Ok(true)
}

impl EditSession {
    /// Creates a blank experience server-side and puts it at the top.
    ///
    /// The insert happens immediately so the record has an identity; the
    /// rest of the list is only renumbered locally.
    pub async fn add_experience(
        &mut self,
        store: &dyn TableStore,
    ) -> Result<&Experience, EditorError> {
        let row = store
            .insert_experience(NewExperience::blank())
            .await
            .map_err(|e| {
                error!("Error adding experience: {e}");
                EditorError::Insert(e)
            })?;

        let created = Experience::from(row);
        info!("Added experience {}", created.id);
        self.inserted.insert(created.id);
        self.edited_experiences.insert(0, created);
        renumber(&mut self.edited_experiences);
        self.persist_draft();
        Ok(&self.edited_experiences[0])
    }

    /// Drops the record from the Edited list. The row is deleted
    /// server-side on the next successful save.
    pub fn remove_experience(&mut self, id: i64) -> Result<(), EditorError> {
        let index = self
            .edited_experiences
            .iter()
            .position(|e| e.id == id)
            .ok_or(EditorError::ExperienceNotFound(id))?;
        self.edited_experiences.remove(index);
        renumber(&mut self.edited_experiences);
        self.persist_draft();
        Ok(())
    }

    pub fn move_experience(&mut self, id: i64, direction: Direction) -> Result<bool, EditorError> {
        let moved = move_within(&mut self.edited_experiences, id, direction)?;
        self.persist_draft();
        Ok(moved)
    }

    /// Sets one language of one localized field of one record.
    pub fn update_field(
        &mut self,
        id: i64,
        field: ExperienceField,
        language: &str,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        let experience = self
            .edited_experiences
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EditorError::ExperienceNotFound(id))?;
        experience.field_mut(field).set(language, value);
        self.persist_draft();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftStore;
    use crate::editor::test_support::*;
    use crate::store::{InMemoryTableStore, Table};

    fn list(n: i64) -> Vec<Experience> {
        (0..n)
            .map(|i| Experience::from(experience_row(i + 1, i as i32, "x")))
            .collect()
    }

    #[test]
    fn test_move_keeps_dense_order() {
        let mut l = list(4);
        assert!(move_within(&mut l, 3, Direction::Up).unwrap());
        assert_eq!(ids(&l), vec![1, 3, 2, 4]);
        assert_eq!(order(&l), vec![0, 1, 2, 3]);
        assert!(move_within(&mut l, 1, Direction::Down).unwrap());
        assert_eq!(ids(&l), vec![3, 1, 2, 4]);
        assert_eq!(order(&l), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_up_then_down_restores_order() {
        let original = list(5);
        let mut l = original.clone();
        move_within(&mut l, 4, Direction::Up).unwrap();
        move_within(&mut l, 4, Direction::Down).unwrap();
        assert_eq!(l, original);
    }

    #[test]
    fn test_move_at_boundary_is_noop() {
        let original = list(3);
        let mut l = original.clone();
        assert!(!move_within(&mut l, 1, Direction::Up).unwrap());
        assert!(!move_within(&mut l, 3, Direction::Down).unwrap());
        assert_eq!(l, original);
    }

    #[test]
    fn test_move_unknown_id_errors() {
        let mut l = list(2);
        assert!(matches!(
            move_within(&mut l, 42, Direction::Up),
            Err(EditorError::ExperienceNotFound(42))
        ));
    }

    #[test]
    fn test_move_renumbers_stale_indices() {
        let mut l = list(3);
        l[0].order_index = 10;
        l[2].order_index = 7;
        move_within(&mut l, 2, Direction::Down).unwrap();
        assert_eq!(ids(&l), vec![1, 3, 2]);
        assert_eq!(order(&l), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_add_prepends_and_renumbers() {
        let store = seeded_store();
        let (mut session, drafts) = loaded_session(&store).await;
        let id = session.add_experience(store.as_ref()).await.unwrap().id;

        let edited = session.edited_experiences();
        assert_eq!(edited.len(), 4);
        assert_eq!(edited[0].id, id);
        assert_eq!(order(edited), vec![0, 1, 2, 3]);
        assert_eq!(edited[0].title.get("nl"), "");
        assert_eq!(edited[0].title.get("en"), "");
        assert!(store.experience(id).is_some());
        assert!(drafts.raw().is_some());
        // Original is not touched by user actions.
        assert_eq!(session.original_experiences().len(), 3);
    }

    #[tokio::test]
    async fn test_add_failure_leaves_list_unchanged() {
        let store = seeded_store();
        let (mut session, _) = loaded_session(&store).await;
        store.set_failing(Table::Experiences, true);
        let err = session.add_experience(store.as_ref()).await.unwrap_err();
        assert!(matches!(err, EditorError::Insert(_)));
        assert_eq!(ids(session.edited_experiences()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_add_to_empty_list() {
        let store = InMemoryTableStore::new();
        let (mut session, _) = loaded_session(&store).await;
        session.add_experience(&store).await.unwrap();
        assert_eq!(order(session.edited_experiences()), vec![0]);
    }

    #[tokio::test]
    async fn test_remove_is_local_until_save() {
        let store = seeded_store();
        let (mut session, _) = loaded_session(&store).await;
        session.remove_experience(2).unwrap();
        assert_eq!(ids(session.edited_experiences()), vec![1, 3]);
        assert_eq!(order(session.edited_experiences()), vec![0, 1]);
        assert!(store.experience(2).is_some());
        assert_eq!(session.pending_deletions(), vec![2]);
    }

    #[tokio::test]
    async fn test_update_field_touches_one_language() {
        let store = seeded_store();
        let (mut session, drafts) = loaded_session(&store).await;
        session
            .update_field(2, ExperienceField::Company, "en", "Acme")
            .unwrap();

        let edited = session.edited_experiences();
        assert_eq!(edited[1].company.get("en"), "Acme");
        assert_eq!(edited[1].company.get("nl"), "");
        assert_eq!(edited[1].title, session.original_experiences()[1].title);
        assert_eq!(edited[0], session.original_experiences()[0]);
        assert_eq!(order(edited), vec![0, 1, 2]);

        let draft = drafts.load().unwrap().unwrap();
        assert_eq!(draft, edited);
    }
}
