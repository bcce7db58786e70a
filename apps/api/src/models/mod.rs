pub mod contact;
pub mod content;
pub mod experience;
pub mod localized;

pub use contact::{ContactEntry, ContactPatch};
pub use content::{content_map_from_rows, ContentKey, ContentMap, ContentRow};
pub use experience::{Experience, ExperienceField, ExperienceRow, NewExperience};
pub use localized::{Language, LocalizedField, SUPPORTED_LANGUAGES};
