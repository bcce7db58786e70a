//! Admin sign-in gate.
//!
//! A correct password yields a bearer token; admin routes extract
//! [`AdminSession`], which rejects requests without a live token.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// How long an admin token stays valid after sign-in.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Compares two secrets without exiting early on the first differing byte.
pub fn password_matches(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    let mut diff = u8::from(given.len() != expected.len());
    for (i, byte) in expected.iter().enumerate() {
        diff |= byte ^ given.get(i).copied().unwrap_or(0);
    }
    diff == 0
}

/// In-memory map of admin tokens to their issue time. Lost on restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Issues a token, dropping any that have expired.
    pub async fn create_session(&self) -> Uuid {
        let token = Uuid::new_v4();
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, issued| now < *issued + self.ttl);
        sessions.insert(token, now);
        token
    }

    pub async fn is_active(&self, token: &Uuid) -> bool {
        self.sessions
            .read()
            .await
            .get(token)
            .is_some_and(|issued| Utc::now() < *issued + self.ttl)
    }

    pub async fn destroy_session(&self, token: &Uuid) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

/// Proof that the request carries a live admin token.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    pub token: Uuid,
}

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        if !state.sessions.is_active(&token).await {
            return Err(AppError::Unauthorized);
        }
        Ok(AdminSession { token })
    }
}
