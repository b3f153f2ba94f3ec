use chrono::{DateTime, Utc};
use notes::auth::{Account, Note, NoteDraft};
use notes::validation::ValidationError;
use notes::Flash;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Body of the anonymous landing page.
#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub signed_in_as: Option<String>,
    pub flash: Option<Flash>,
}

/// Public view of an account; the password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            username: account.identifier,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            body: note.body,
            owner: note.owner,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub account: AccountResponse,
    pub notes: Vec<NoteResponse>,
    pub flash: Option<Flash>,
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ValidationError>,
    /// Values to put back into the form when it is shown again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<NoteDraft>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
            values: None,
        }
    }

    pub fn with_fields(mut self, fields: &[ValidationError]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    pub fn with_values(mut self, values: NoteDraft) -> Self {
        self.values = Some(values);
        self
    }
}
