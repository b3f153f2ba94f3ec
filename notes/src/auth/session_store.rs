use super::session::{Session, SessionToken};
use async_trait::async_trait;
use shared::Result;
use std::sync::Arc;
use tracing::debug;

/// Trait for session storage operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session bound to the given identifier
    async fn create_session(&self, identifier: &str, client_ip: Option<String>) -> Result<Session>;

    /// Get a session by token; `Error::NotFound` if there is none
    async fn get_session(&self, token: &SessionToken) -> Result<Session>;

    /// Delete a session, reporting whether one existed
    async fn delete_session(&self, token: &SessionToken) -> Result<bool>;

    /// Delete all sessions bound to an identifier
    async fn delete_identity_sessions(&self, identifier: &str) -> Result<usize>;
}

/// Maps opaque browser-held tokens to identities.
///
/// Only the identifier is kept; callers re-resolve it against the credential
/// store on every request.
#[derive(Clone)]
pub struct SessionManager {
    repository: Arc<dyn SessionRepository>,
}

impl SessionManager {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Establish a session for `identifier`.
    ///
    /// The token this browser presented before (if any) is ended, as is every
    /// other session bound to `identifier`, so no earlier token survives a login.
    pub async fn start(
        &self,
        prior: Option<&SessionToken>,
        identifier: &str,
        client_ip: Option<String>,
    ) -> Result<Session> {
        if let Some(prior) = prior {
            self.end(prior).await?;
        }

        let replaced = self.repository.delete_identity_sessions(identifier).await?;
        if replaced > 0 {
            debug!(identifier, replaced, "replaced existing sessions");
        }

        self.repository.create_session(identifier, client_ip).await
    }

    /// Resolve a token to the identifier it is bound to. No side effects.
    pub async fn current(&self, token: &SessionToken) -> Result<Option<String>> {
        match self.repository.get_session(token).await {
            Ok(session) => Ok(Some(session.identifier)),
            Err(shared::Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// End a session. Unknown or already-ended tokens are a no-op.
    pub async fn end(&self, token: &SessionToken) -> Result<()> {
        self.repository.delete_session(token).await?;
        Ok(())
    }

    /// End every session bound to an identifier (account deletion)
    pub async fn end_all(&self, identifier: &str) -> Result<usize> {
        self.repository.delete_identity_sessions(identifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::moka_session_repository::MokaSessionRepository;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MokaSessionRepository::with_defaults()))
    }

    #[tokio::test]
    async fn test_start_and_current() {
        let sessions = manager();

        let session = sessions.start(None, "alice", None).await.unwrap();
        assert_eq!(
            sessions.current(&session.token).await.unwrap(),
            Some("alice".to_string())
        );
        assert_eq!(sessions.current(&"nope".to_string()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_new_session_replaces_old_token_for_same_identity() {
        let sessions = manager();

        let old = sessions.start(None, "alice", None).await.unwrap();
        let new = sessions.start(None, "alice", None).await.unwrap();

        assert_ne!(old.token, new.token);
        assert_eq!(sessions.current(&old.token).await.unwrap(), None);
        assert_eq!(
            sessions.current(&new.token).await.unwrap(),
            Some("alice".to_string())
        );
        assert_eq!(sessions.end_all("alice").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_prior_browser_token_is_ended_on_login() {
        let sessions = manager();

        // Browser was logged in as bob, then logs in as alice.
        let bob = sessions.start(None, "bob", None).await.unwrap();
        let alice = sessions.start(Some(&bob.token), "alice", None).await.unwrap();

        assert_eq!(sessions.current(&bob.token).await.unwrap(), None);
        assert_eq!(
            sessions.current(&alice.token).await.unwrap(),
            Some("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_end_is_idempotent() {
        let sessions = manager();

        let session = sessions.start(None, "alice", None).await.unwrap();
        sessions.end(&session.token).await.unwrap();
        sessions.end(&session.token).await.unwrap();
        sessions.end(&"never-issued".to_string()).await.unwrap();

        assert_eq!(sessions.current(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_end_all_only_touches_one_identity() {
        let sessions = manager();

        let alice = sessions.start(None, "alice", None).await.unwrap();
        let bob = sessions.start(None, "bob", None).await.unwrap();

        assert_eq!(sessions.end_all("alice").await.unwrap(), 1);
        assert_eq!(sessions.current(&alice.token).await.unwrap(), None);
        assert_eq!(
            sessions.current(&bob.token).await.unwrap(),
            Some("bob".to_string())
        );
    }
}
