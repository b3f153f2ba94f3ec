use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered account. `identifier` is the primary key and the identity carried by sessions.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub identifier: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        identifier: String,
        password_hash: String,
        email: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            identifier,
            password_hash,
            email,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// The hash stays out of logs and panic messages.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("identifier", &self.identifier)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: u64, owner: String, title: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            body,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration input as submitted by a visitor, plaintext password included.
#[derive(Clone, Deserialize)]
pub struct Registration {
    #[serde(alias = "username")]
    pub identifier: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Registration {
    /// Surrounding whitespace stripped from every field except the password.
    pub fn trimmed(self) -> Self {
        Self {
            identifier: self.identifier.trim().to_string(),
            password: self.password,
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Title and body of a note being created or edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    #[serde(alias = "content")]
    pub body: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
