use super::error::AuthError;
use super::models::{Account, Note, NoteDraft, Registration};
use super::password::{hash_password, verify_against_dummy, verify_password};
use super::repository::{AccountRepository, NoteRepository};
use super::session_store::SessionManager;
use super::sled_repository::SledStore;
use crate::validation::{validate_note, validate_registration};
use std::sync::Arc;
use tracing::info;

/// Accounts and notes, with hashing and input checks applied before anything is persisted.
pub struct CredentialStore {
    account_repo: Arc<dyn AccountRepository>,
    note_repo: Arc<dyn NoteRepository>,
}

impl CredentialStore {
    pub fn new(account_repo: Arc<dyn AccountRepository>, note_repo: Arc<dyn NoteRepository>) -> Self {
        Self {
            account_repo,
            note_repo,
        }
    }

    pub fn with_sled(store: SledStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    /// Register a new account.
    ///
    /// Uniqueness is left entirely to the repository insert; a duplicate
    /// identifier or email comes back as `AuthError::Conflict`.
    pub async fn register(&self, registration: Registration) -> Result<Account, AuthError> {
        // Validate exactly what gets stored.
        let registration = registration.trimmed();
        validate_registration(&registration)?;

        let password_hash = hash_password(&registration.password)?;
        let account = Account::new(
            registration.identifier,
            password_hash,
            registration.email,
            registration.first_name,
            registration.last_name,
        );

        let account = self.account_repo.create(account).await?;
        info!(identifier = %account.identifier, "account registered");
        Ok(account)
    }

    /// Check credentials. Unknown identifier and wrong password both yield `None`.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<Account>, AuthError> {
        let Some(account) = self.account_repo.find_by_identifier(identifier).await? else {
            verify_against_dummy(password);
            return Ok(None);
        };

        if verify_password(password, &account.password_hash)? {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    pub async fn find_account(&self, identifier: &str) -> Result<Account, AuthError> {
        self.account_repo
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Delete an account and, by cascade, every note it owns; then end its sessions.
    ///
    /// The cascade covers the whole account and nothing narrower. Removing a
    /// subset of someone's notes goes through `delete_note`.
    pub async fn delete_account(
        &self,
        identifier: &str,
        sessions: &SessionManager,
    ) -> Result<usize, AuthError> {
        let removed_notes = self.account_repo.delete_cascade(identifier).await?;
        let ended_sessions = sessions.end_all(identifier).await?;

        info!(identifier, removed_notes, ended_sessions, "account deleted");
        Ok(removed_notes)
    }

    pub async fn find_note(&self, id: u64) -> Result<Note, AuthError> {
        self.note_repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NoteNotFound)
    }

    pub async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, AuthError> {
        self.note_repo.list_by_owner(owner).await
    }

    pub async fn create_note(&self, owner: &str, draft: NoteDraft) -> Result<Note, AuthError> {
        validate_note(&draft)?;
        self.note_repo.create(owner, draft).await
    }

    pub async fn update_note(&self, id: u64, draft: NoteDraft) -> Result<Note, AuthError> {
        validate_note(&draft)?;
        self.note_repo.update(id, draft).await
    }

    pub async fn delete_note(&self, id: u64) -> Result<(), AuthError> {
        self.note_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::ConflictField;
    use crate::auth::moka_session_repository::MokaSessionRepository;
    use tempfile::TempDir;

    fn registration(identifier: &str, password: &str, email: &str) -> Registration {
        Registration {
            identifier: identifier.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
        }
    }

    fn credential_store() -> CredentialStore {
        CredentialStore::with_sled(SledStore::temporary().unwrap())
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let temp_dir = TempDir::new().unwrap();
        let store =
            CredentialStore::with_sled(SledStore::new(temp_dir.path().join("notes.sled")).unwrap());

        let account = store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(account.identifier, "alice");
        assert_ne!(account.password_hash, "pw1");
        assert!(verify_password("pw1", &account.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input_before_storage() {
        let store = credential_store();

        let result = store
            .register(registration(&"a".repeat(21), "pw1", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));

        // Nothing reached the store, so the email is still free.
        assert!(store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_checks_trimmed_values() {
        let store = credential_store();

        let padded = format!(" {} ", "a".repeat(20));
        let account = store
            .register(registration(&padded, "   ", " padded@example.com "))
            .await
            .unwrap();

        assert_eq!(account.identifier, "a".repeat(20));
        assert_eq!(account.email, "padded@example.com");
        // The password is taken as given, whitespace included.
        assert!(store.authenticate(&account.identifier, "   ").await.unwrap().is_some());
        assert!(store.authenticate(&account.identifier, "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_conflicts() {
        let store = credential_store();
        store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .unwrap();

        let result = store
            .register(registration("alice", "pw2", "alice2@example.com"))
            .await;
        assert!(matches!(
            result,
            Err(AuthError::Conflict(ConflictField::Identifier))
        ));

        let result = store
            .register(registration("bob", "pw2", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(AuthError::Conflict(ConflictField::Email))));

        // The losing registration did not overwrite the original password.
        assert!(store.authenticate("alice", "pw1").await.unwrap().is_some());
        assert!(store.authenticate("alice", "pw2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_round_trip() {
        let store = credential_store();
        store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .unwrap();

        let account = store.authenticate("alice", "pw1").await.unwrap();
        assert_eq!(account.unwrap().identifier, "alice");

        // Wrong password and unknown identifier look the same.
        assert!(store.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(store.authenticate("nobody", "pw1").await.unwrap().is_none());
        assert!(store.authenticate("alice", "").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_account() {
        let store = credential_store();
        store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(store.find_account("alice").await.unwrap().email, "alice@example.com");
        assert!(matches!(
            store.find_account("bob").await,
            Err(AuthError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_note_operations_validate_input() {
        let store = credential_store();
        store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .unwrap();

        let note = store
            .create_note("alice", NoteDraft::new("T", "B"))
            .await
            .unwrap();
        assert_eq!(note.owner, "alice");

        assert!(matches!(
            store.create_note("alice", NoteDraft::new("", "B")).await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            store.update_note(note.id, NoteDraft::new("T", "")).await,
            Err(AuthError::Validation(_))
        ));

        let unchanged = store.find_note(note.id).await.unwrap();
        assert_eq!(unchanged.body, "B");
    }

    #[tokio::test]
    async fn test_delete_account_cascades_and_ends_sessions() {
        let store = credential_store();
        let sessions = SessionManager::new(Arc::new(MokaSessionRepository::with_defaults()));

        store
            .register(registration("alice", "pw1", "alice@example.com"))
            .await
            .unwrap();
        store
            .register(registration("bob", "pw2", "bob@example.com"))
            .await
            .unwrap();

        let alice_note = store
            .create_note("alice", NoteDraft::new("T", "B"))
            .await
            .unwrap();
        let bob_note = store
            .create_note("bob", NoteDraft::new("T", "B"))
            .await
            .unwrap();

        let alice_session = sessions.start(None, "alice", None).await.unwrap();
        let bob_session = sessions.start(None, "bob", None).await.unwrap();

        let removed = store.delete_account("alice", &sessions).await.unwrap();
        assert_eq!(removed, 1);

        assert!(matches!(
            store.find_note(alice_note.id).await,
            Err(AuthError::NoteNotFound)
        ));
        assert_eq!(sessions.current(&alice_session.token).await.unwrap(), None);

        assert!(store.find_note(bob_note.id).await.is_ok());
        assert_eq!(
            sessions.current(&bob_session.token).await.unwrap(),
            Some("bob".to_string())
        );
    }
}
