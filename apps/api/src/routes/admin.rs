//! Axum route handlers for the admin panel.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{password_matches, AdminSession};
use crate::editor::{Direction, SaveReport};
use crate::errors::AppError;
use crate::models::{ContactPatch, Experience, ExperienceField};
use crate::render::{render_admin_view, AdminView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: Uuid,
    pub state: AdminView,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub moved: bool,
    pub state: AdminView,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: ExperienceField,
    pub language: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentUpdate {
    pub key: String,
    pub language: String,
    pub value: String,
}

fn require_non_empty(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/admin/session
///
/// Signs in and loads the edit session from the store, restoring any draft.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    if !password_matches(&req.password, &state.config.admin_password) {
        warn!("Rejected admin sign-in");
        return Err(AppError::Unauthorized);
    }

    let token = state.sessions.create_session().await;
    let mut editor = state.editor.lock().await;
    editor.load(state.store.as_ref()).await;
    info!("Admin signed in");

    Ok(Json(SignInResponse {
        token,
        state: render_admin_view(&editor, Utc::now()),
    }))
}

/// DELETE /api/v1/admin/session
pub async fn handle_sign_out(
    State(state): State<AppState>,
    session: AdminSession,
) -> StatusCode {
    state.sessions.destroy_session(&session.token).await;
    info!("Admin signed out");
    StatusCode::NO_CONTENT
}

// ────────────────────────────────────────────────────────────────────────────
// Edit session
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/state
pub async fn handle_get_state(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Json<AdminView> {
    let editor = state.editor.lock().await;
    Json(render_admin_view(&editor, Utc::now()))
}

/// POST /api/v1/admin/reload
pub async fn handle_reload(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Json<AdminView> {
    let mut editor = state.editor.lock().await;
    editor.load(state.store.as_ref()).await;
    Json(render_admin_view(&editor, Utc::now()))
}

/// POST /api/v1/admin/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<(StatusCode, Json<Experience>), AppError> {
    let mut editor = state.editor.lock().await;
    let created = editor.add_experience(state.store.as_ref()).await?.clone();
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/admin/experiences/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<AdminView>, AppError> {
    let mut editor = state.editor.lock().await;
    editor.remove_experience(id)?;
    Ok(Json(render_admin_view(&editor, Utc::now())))
}

/// POST /api/v1/admin/experiences/:id/move
pub async fn handle_move_experience(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, AppError> {
    let mut editor = state.editor.lock().await;
    let moved = editor.move_experience(id, req.direction)?;
    Ok(Json(MoveResponse {
        moved,
        state: render_admin_view(&editor, Utc::now()),
    }))
}

/// PATCH /api/v1/admin/experiences/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<Experience>, AppError> {
    require_non_empty("language", &req.language)?;
    let mut editor = state.editor.lock().await;
    editor.update_field(id, req.field, &req.language, req.value)?;
    let updated = editor
        .edited_experiences()
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Experience {id} not found")))?;
    Ok(Json(updated))
}

/// PATCH /api/v1/admin/content
pub async fn handle_update_content(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(req): Json<ContentUpdate>,
) -> Result<Json<AdminView>, AppError> {
    require_non_empty("key", &req.key)?;
    require_non_empty("language", &req.language)?;
    let mut editor = state.editor.lock().await;
    editor.update_content(&req.key, &req.language, req.value);
    Ok(Json(render_admin_view(&editor, Utc::now())))
}

/// PATCH /api/v1/admin/contacts/:id
pub async fn handle_update_contact(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<AdminView>, AppError> {
    let mut editor = state.editor.lock().await;
    editor.update_contact(id, patch)?;
    Ok(Json(render_admin_view(&editor, Utc::now())))
}

/// POST /api/v1/admin/save
pub async fn handle_save(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<SaveReport>, AppError> {
    let mut editor = state.editor.lock().await;
    let report = editor.save(state.store.clone()).await?;
    Ok(Json(report))
}

/// POST /api/v1/admin/discard
pub async fn handle_discard(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Json<AdminView> {
    let mut editor = state.editor.lock().await;
    editor.discard(state.store.as_ref()).await;
    Json(render_admin_view(&editor, Utc::now()))
}
