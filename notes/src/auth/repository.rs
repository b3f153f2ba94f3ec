use super::error::AuthError;
use super::models::{Account, Note, NoteDraft};
use async_trait::async_trait;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; uniqueness of identifier and email is decided here, atomically
    async fn create(&self, account: Account) -> Result<Account, AuthError>;

    /// Find an account by identifier
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AuthError>;

    /// Delete an account together with every note it owns
    async fn delete_cascade(&self, identifier: &str) -> Result<usize, AuthError>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Create a note for an existing owner, assigning a fresh id
    async fn create(&self, owner: &str, draft: NoteDraft) -> Result<Note, AuthError>;

    /// Find a note by id
    async fn find_by_id(&self, id: u64) -> Result<Option<Note>, AuthError>;

    /// List an owner's notes in id order
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Note>, AuthError>;

    /// Replace title and body of an existing note
    async fn update(&self, id: u64, draft: NoteDraft) -> Result<Note, AuthError>;

    /// Delete a single note
    async fn delete(&self, id: u64) -> Result<(), AuthError>;
}
