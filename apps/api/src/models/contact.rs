use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A phone number, email address or link shown in the contact section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContactEntry {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub value: String,
    pub label: String,
}

/// Partial update applied by the contact editor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
    pub label: Option<String>,
}

impl ContactEntry {
    pub fn apply(&mut self, patch: ContactPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
    }
}
