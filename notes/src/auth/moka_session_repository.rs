use super::session::{generate_session_token, Session, SessionToken};
use super::session_store::SessionRepository;
use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::RwLock;
use shared::Result;
use std::sync::Arc;

/// Identifier type alias
pub type Identifier = String;

/// Moka-based in-memory session repository with dual-index support
pub struct MokaSessionRepository {
    // Primary index: token -> session
    sessions: Cache<SessionToken, Session>,
    // Secondary index: identifier -> list of session tokens
    identity_sessions: Cache<Identifier, Arc<RwLock<Vec<SessionToken>>>>,
}

impl MokaSessionRepository {
    /// Create a new Moka session repository, optionally bounded in size.
    /// Sessions have no time-based expiry; they live until ended or evicted.
    pub fn new(max_sessions: Option<u64>) -> Self {
        let mut sessions_builder = Cache::builder();
        let mut identity_sessions_builder = Cache::builder();

        if let Some(capacity) = max_sessions {
            sessions_builder = sessions_builder.max_capacity(capacity);
            identity_sessions_builder = identity_sessions_builder.max_capacity(capacity);
        }

        Self {
            sessions: sessions_builder.build(),
            identity_sessions: identity_sessions_builder.build(),
        }
    }

    /// Create with default settings (unbounded)
    pub fn with_defaults() -> Self {
        Self::new(None)
    }

    async fn tokens_for(&self, identifier: &str) -> Vec<SessionToken> {
        match self.identity_sessions.get(identifier).await {
            Some(tokens_lock) => tokens_lock.read().clone(),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl SessionRepository for MokaSessionRepository {
    async fn create_session(&self, identifier: &str, client_ip: Option<String>) -> Result<Session> {
        let token = generate_session_token();
        let session = Session::new(token.clone(), identifier.to_string(), client_ip);

        // Store session in primary index
        self.sessions.insert(token.clone(), session.clone()).await;

        // Add token to the identity's session list in secondary index
        let tokens_lock = self
            .identity_sessions
            .get_with(identifier.to_string(), async {
                Arc::new(RwLock::new(Vec::new()))
            })
            .await;
        tokens_lock.write().push(token);

        Ok(session)
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Session> {
        self.sessions
            .get(token)
            .await
            .ok_or(shared::Error::NotFound)
    }

    async fn delete_session(&self, token: &SessionToken) -> Result<bool> {
        let session = self.sessions.remove(token).await;

        if let Some(data) = &session {
            // Remove from identity index
            if let Some(tokens_lock) = self.identity_sessions.get(&data.identifier).await {
                tokens_lock.write().retain(|t| t != token);
            }
        }

        Ok(session.is_some())
    }

    async fn delete_identity_sessions(&self, identifier: &str) -> Result<usize> {
        let mut count = 0;

        for token in self.tokens_for(identifier).await.iter() {
            if self.sessions.remove(token).await.is_some() {
                count += 1;
            }
        }

        self.identity_sessions.invalidate(identifier).await;

        Ok(count)
    }
}
