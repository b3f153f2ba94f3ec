// Public API
pub mod credential_store;
pub mod error;
pub mod gate;
pub mod moka_session_repository;
pub mod models;
pub mod password;
pub mod repository;
pub mod session;
pub mod session_store;
pub mod sled_repository;

// Re-export commonly used types
pub use credential_store::CredentialStore;
pub use error::{AuthError, ConflictField};
pub use gate::{authorize, decide, Decision, Identity};
pub use moka_session_repository::MokaSessionRepository;
pub use models::{Account, Note, NoteDraft, Registration};
pub use repository::{AccountRepository, NoteRepository};
pub use session::{current_timestamp_ms, format_utc_time, generate_session_token, Session, SessionToken};
pub use session_store::{SessionManager, SessionRepository};
pub use sled_repository::SledStore;
