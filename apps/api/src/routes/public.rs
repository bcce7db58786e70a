use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::errors::AppError;
use crate::models::{content_map_from_rows, Experience, Language};
use crate::render::{language_splash, render_public_page, LanguageSplash, PublicPage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub lang: Option<String>,
}

/// GET /api/v1/languages
pub async fn handle_languages() -> Json<LanguageSplash> {
    Json(language_splash())
}

/// GET /api/v1/page?lang=nl
///
/// Reads the three tables fresh on every request. A failed read is logged
/// and renders as an empty section.
pub async fn handle_get_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PublicPage>, AppError> {
    let language = match query.lang.as_deref() {
        Some(code) => code.parse::<Language>().map_err(AppError::Validation)?,
        None => Language::default(),
    };

    let (content, experiences, contacts) = tokio::join!(
        state.store.fetch_content(),
        state.store.fetch_experiences(),
        state.store.fetch_contacts(),
    );

    let content = content
        .map(content_map_from_rows)
        .unwrap_or_else(|e| {
            error!("Error fetching content: {e}");
            Default::default()
        });
    let experiences: Vec<Experience> = experiences
        .map(|rows| rows.into_iter().map(Experience::from).collect())
        .unwrap_or_else(|e| {
            error!("Error fetching experiences: {e}");
            Vec::new()
        });
    let contacts = contacts.unwrap_or_else(|e| {
        error!("Error fetching contact info: {e}");
        Vec::new()
    });

    Ok(Json(render_public_page(
        &state.profile,
        language,
        &content,
        &experiences,
        &contacts,
    )))
}
