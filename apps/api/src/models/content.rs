use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::LocalizedField;

/// Free-form page text: content key -> language -> value.
pub type ContentMap = BTreeMap<String, LocalizedField>;

/// Row shape of the `content` table, keyed by (key, language).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContentRow {
    pub key: String,
    pub language: String,
    pub value: String,
}

/// A (key, language) pair that exists server-side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, FromRow)]
pub struct ContentKey {
    pub key: String,
    pub language: String,
}

/// Folds flat content rows into the two-level map.
pub fn content_map_from_rows(rows: impl IntoIterator<Item = ContentRow>) -> ContentMap {
    let mut map = ContentMap::new();
    for row in rows {
        map.entry(row.key).or_default().set(row.language, row.value);
    }
    map
}
