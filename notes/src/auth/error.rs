use crate::validation::ValidationErrors;
use std::fmt;
use thiserror::Error;

/// Which uniqueness constraint a registration ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Identifier,
    Email,
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictField::Identifier => write!(f, "Username"),
            ConflictField::Email => write!(f, "Email"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0} already taken")]
    Conflict(ConflictField),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Note not found")]
    NoteNotFound,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<sled::Error> for AuthError {
    fn from(err: sled::Error) -> Self {
        AuthError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::SerializationError(err.to_string())
    }
}

impl From<shared::Error> for AuthError {
    fn from(err: shared::Error) -> Self {
        AuthError::SessionError(err.to_string())
    }
}
