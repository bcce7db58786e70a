pub mod admin;
pub mod health;
pub mod public;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public site
        .route("/api/v1/languages", get(public::handle_languages))
        .route("/api/v1/page", get(public::handle_get_page))
        // Admin session
        .route(
            "/api/v1/admin/session",
            post(admin::handle_sign_in).delete(admin::handle_sign_out),
        )
        // Admin editor
        .route("/api/v1/admin/state", get(admin::handle_get_state))
        .route("/api/v1/admin/reload", post(admin::handle_reload))
        .route(
            "/api/v1/admin/experiences",
            post(admin::handle_add_experience),
        )
        .route(
            "/api/v1/admin/experiences/:id",
            delete(admin::handle_remove_experience).patch(admin::handle_update_experience),
        )
        .route(
            "/api/v1/admin/experiences/:id/move",
            post(admin::handle_move_experience),
        )
        .route("/api/v1/admin/content", patch(admin::handle_update_content))
        .route(
            "/api/v1/admin/contacts/:id",
            patch(admin::handle_update_contact),
        )
        .route("/api/v1/admin/save", post(admin::handle_save))
        .route("/api/v1/admin/discard", post(admin::handle_discard))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::draft::MemoryDraftStore;
    use crate::editor::test_support::seeded_store;
    use crate::store::{InMemoryTableStore, Table};

    const PASSWORD: &str = "hunter2";

    fn test_config() -> Config {
        Config {
            database_url: None,
            admin_password: PASSWORD.to_string(),
            draft_dir: String::new(),
            site_name: "Jan Jansen".to_string(),
            site_subtitle: "Engineer".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(store: Arc<InMemoryTableStore>) -> Router {
        let state = AppState::new(store, Arc::new(MemoryDraftStore::new()), test_config());
        build_router(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_in(app: &Router) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/admin/session",
            None,
            Some(json!({"password": PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_public_page_renders_requested_language() {
        let app = app(seeded_store());
        let (status, body) = send(&app, Method::GET, "/api/v1/page?lang=en", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intro"], "B");
        assert_eq!(body["experience"]["items"][0]["title"], "first");
        assert_eq!(body["contact"]["calls"][0]["label"], "Call me");

        let (status, _) = send(&app, Method::GET, "/api/v1/page?lang=fr", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_page_survives_fetch_failure() {
        let store = seeded_store();
        store.set_failing(Table::Experiences, true);
        let app = app(store);
        let (status, body) = send(&app, Method::GET, "/api/v1/page", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["language"], "nl");
        assert_eq!(body["intro"], "A");
        assert_eq!(body["experience"]["items"], json!([]));
    }

    #[tokio::test]
    async fn test_admin_routes_require_session() {
        let app = app(seeded_store());
        let (status, body) = send(&app, Method::GET, "/api/v1/admin/state", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/admin/session",
            None,
            Some(json!({"password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_edit_and_save_flow() {
        let store = seeded_store();
        let app = app(store.clone());
        let token = sign_in(&app).await;
        let token = Some(token.as_str());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/admin/experiences/2/move",
            token,
            Some(json!({"direction": "up"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["moved"], true);
        assert_eq!(body["state"]["experiences"][0]["id"], 2);

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/v1/admin/content",
            token,
            Some(json!({"key": "intro", "language": "nl", "value": "A2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, "/api/v1/admin/save", token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content_written"], 1);
        assert_eq!(body["notification"]["message"], "Changes saved successfully!");
        assert_eq!(store.experience(2).unwrap().order_index, 0);

        let (_, body) = send(&app, Method::GET, "/api/v1/admin/state", token, None).await;
        assert_eq!(body["dirty"], false);
    }

    #[tokio::test]
    async fn test_failed_save_reports_message() {
        let store = seeded_store();
        let app = app(store.clone());
        let token = sign_in(&app).await;
        let token = Some(token.as_str());

        send(
            &app,
            Method::PATCH,
            "/api/v1/admin/contacts/2",
            token,
            Some(json!({"value": "new@example.com"})),
        )
        .await;
        store.set_failing(Table::ContactInfo, true);

        let (status, body) = send(&app, Method::POST, "/api/v1/admin/save", token, None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "SAVE_FAILED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to save changes: "));

        let (_, body) = send(&app, Method::GET, "/api/v1/admin/state", token, None).await;
        assert_eq!(body["dirty"], true);
        assert_eq!(body["contacts"][1]["value"], "new@example.com");
    }

    #[tokio::test]
    async fn test_unknown_experience_is_not_found() {
        let app = app(seeded_store());
        let token = sign_in(&app).await;
        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/v1/admin/experiences/99",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let app = app(seeded_store());
        let token = sign_in(&app).await;
        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/v1/admin/session",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, "/api/v1/admin/state", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
