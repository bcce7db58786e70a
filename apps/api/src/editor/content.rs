use std::collections::HashSet;

use crate::editor::EditSession;
use crate::models::{ContentKey, ContentMap, ContentRow};

/// Rows of `edited` that must be written, given which (key, language)
/// pairs already exist server-side.
///
/// A row is written when the pair does not exist yet, or when its value
/// differs from `original`. Comparison is exact string equality.
pub fn diff_content_against(
    existing: &HashSet<ContentKey>,
    original: &ContentMap,
    edited: &ContentMap,
) -> Vec<ContentRow> {
    let mut rows = Vec::new();
    for (key, field) in edited {
        for (language, value) in field.iter() {
            let stored = ContentKey {
                key: key.clone(),
                language: language.to_string(),
            };
            let unchanged = original
                .get(key)
                .is_some_and(|f| f.iter().any(|(l, v)| l == language && v == value));
            if !existing.contains(&stored) || !unchanged {
                rows.push(ContentRow {
                    key: stored.key,
                    language: stored.language,
                    value: value.to_string(),
                });
            }
        }
    }
    rows
}

/// [`diff_content_against`] assuming the server holds exactly `original`.
#[cfg(test)]
pub fn diff_content(original: &ContentMap, edited: &ContentMap) -> Vec<ContentRow> {
    let existing: HashSet<ContentKey> = original
        .iter()
        .flat_map(|(key, field)| {
            field.iter().map(move |(language, _)| ContentKey {
                key: key.clone(),
                language: language.to_string(),
            })
        })
        .collect();
    diff_content_against(&existing, original, edited)
}

impl EditSession {
    /// Sets one language of a content key, creating the key if needed.
    pub fn update_content(&mut self, key: &str, language: &str, value: impl Into<String>) {
        self.edited_content
            .entry(key.to_string())
            .or_default()
            .set(language, value);
    }
}
