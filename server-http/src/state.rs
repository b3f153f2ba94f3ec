use notes::auth::{CredentialStore, MokaSessionRepository, SessionManager, SledStore};
use notes::NotesService;
use shared::config::Config;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: NotesService,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(service: NotesService, secure_cookies: bool) -> Self {
        Self {
            service,
            secure_cookies,
        }
    }

    /// Open the store under the configured data directory and wire up the session layer.
    pub fn from_config(config: &Config) -> Result<Self, notes::auth::AuthError> {
        let store_path = Path::new(&config.data_dir).join("notes.sled");
        info!("Opening credential store at {}", store_path.display());
        let store = SledStore::new(&store_path)?;

        Ok(Self::with_store(store, config.max_sessions, config.secure_cookies))
    }

    pub fn with_store(store: SledStore, max_sessions: Option<u64>, secure_cookies: bool) -> Self {
        let credentials = Arc::new(CredentialStore::with_sled(store));
        let sessions = SessionManager::new(Arc::new(MokaSessionRepository::new(max_sessions)));

        Self::new(NotesService::new(credentials, sessions), secure_cookies)
    }
}
