use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::models::LocalizedField;

/// One résumé entry as held in memory and in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    #[serde(default)]
    pub title: LocalizedField,
    #[serde(default)]
    pub company: LocalizedField,
    #[serde(default)]
    pub period: LocalizedField,
    #[serde(default)]
    pub description: LocalizedField,
    #[serde(default)]
    pub order_index: i32,
}

/// The localized sub-fields of an experience that the editor can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceField {
    Title,
    Company,
    Period,
    Description,
}

impl Experience {
    pub fn field_mut(&mut self, field: ExperienceField) -> &mut LocalizedField {
        match field {
            ExperienceField::Title => &mut self.title,
            ExperienceField::Company => &mut self.company,
            ExperienceField::Period => &mut self.period,
            ExperienceField::Description => &mut self.description,
        }
    }

    pub fn to_row(&self) -> ExperienceRow {
        ExperienceRow {
            id: self.id,
            title: self.title.to_column(),
            company: self.company.to_column(),
            period: self.period.to_column(),
            description: self.description.to_column(),
            order_index: self.order_index,
        }
    }
}

/// An experience that has not been assigned a server identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub title: LocalizedField,
    pub company: LocalizedField,
    pub period: LocalizedField,
    pub description: LocalizedField,
    pub order_index: i32,
}

impl NewExperience {
    /// Blank entry placed before every existing one.
    pub fn blank() -> Self {
        Self {
            title: LocalizedField::empty(),
            company: LocalizedField::empty(),
            period: LocalizedField::empty(),
            description: LocalizedField::empty(),
            order_index: -1,
        }
    }

    /// Row as stored once the backend has assigned `id`.
    pub fn into_row(self, id: i64) -> ExperienceRow {
        ExperienceRow {
            id,
            title: self.title.to_column(),
            company: self.company.to_column(),
            period: self.period.to_column(),
            description: self.description.to_column(),
            order_index: self.order_index,
        }
    }
}

/// Row shape of the `experiences` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExperienceRow {
    pub id: i64,
    pub title: Value,
    pub company: Value,
    pub period: Value,
    pub description: Value,
    pub order_index: i32,
}

impl From<ExperienceRow> for Experience {
    fn from(row: ExperienceRow) -> Self {
        Experience {
            id: row.id,
            title: LocalizedField::from_column(row.title),
            company: LocalizedField::from_column(row.company),
            period: LocalizedField::from_column(row.period),
            description: LocalizedField::from_column(row.description),
            order_index: row.order_index,
        }
    }
}
