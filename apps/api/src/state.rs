use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::draft::DraftStore;
use crate::editor::EditSession;
use crate::render::SiteProfile;
use crate::store::TableStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    /// The single admin edit session. Handlers hold the lock for the whole
    /// mutation, so edits never interleave.
    pub editor: Arc<Mutex<EditSession>>,
    pub sessions: SessionStore,
    pub profile: Arc<SiteProfile>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn TableStore>, drafts: Arc<dyn DraftStore>, config: Config) -> Self {
        let profile = SiteProfile {
            name: config.site_name.clone(),
            subtitle: config.site_subtitle.clone(),
        };
        Self {
            store,
            editor: Arc::new(Mutex::new(EditSession::new(drafts))),
            sessions: SessionStore::new(),
            profile: Arc::new(profile),
            config,
        }
    }
}
