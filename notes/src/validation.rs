use crate::auth::models::{NoteDraft, Registration};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const MAX_IDENTIFIER_LEN: usize = 20;
pub const MAX_EMAIL_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 30;
pub const MAX_TITLE_LEN: usize = 100;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").ok());

// Identifiers end up as a path segment in `/users/{identifier}`, so they stay URL-safe.
static IDENTIFIER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    Required { field: &'static str },
    TooLong { field: &'static str, max: usize },
    InvalidEmail { field: &'static str },
    InvalidCharacters { field: &'static str },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidEmail { field }
            | ValidationError::InvalidCharacters { field } => field,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required { field } => write!(f, "'{}' is required", field),
            ValidationError::TooLong { field, max } => {
                write!(f, "'{}' must be at most {} characters", field, max)
            }
            ValidationError::InvalidEmail { field } => {
                write!(f, "'{}' is not a valid email address", field)
            }
            ValidationError::InvalidCharacters { field } => write!(
                f,
                "'{}' may only contain letters, digits, '.', '_' and '-', and must start with a letter or digit",
                field
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every field notice collected for one submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "Invalid input: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn check_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: Option<usize>,
) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Required { field });
        return;
    }

    if let Some(max) = max {
        if value.chars().count() > max {
            errors.push(ValidationError::TooLong { field, max });
        }
    }
}

/// Password may be anything but empty; surrounding whitespace is part of it.
fn check_password(errors: &mut ValidationErrors, password: &str) {
    if password.is_empty() {
        errors.push(ValidationError::Required { field: "password" });
    }
}

pub fn is_valid_identifier(identifier: &str) -> bool {
    IDENTIFIER_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(identifier))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

pub fn validate_registration(registration: &Registration) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_text(
        &mut errors,
        "username",
        &registration.identifier,
        Some(MAX_IDENTIFIER_LEN),
    );
    if !errors.has_field("username") && !is_valid_identifier(&registration.identifier) {
        errors.push(ValidationError::InvalidCharacters { field: "username" });
    }
    check_password(&mut errors, &registration.password);
    check_text(&mut errors, "email", &registration.email, Some(MAX_EMAIL_LEN));
    if !errors.has_field("email") && !is_valid_email(&registration.email) {
        errors.push(ValidationError::InvalidEmail { field: "email" });
    }
    check_text(
        &mut errors,
        "first_name",
        &registration.first_name,
        Some(MAX_NAME_LEN),
    );
    check_text(
        &mut errors,
        "last_name",
        &registration.last_name,
        Some(MAX_NAME_LEN),
    );

    errors.into_result()
}

pub fn validate_login(identifier: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_text(&mut errors, "username", identifier, Some(MAX_IDENTIFIER_LEN));
    check_password(&mut errors, password);

    errors.into_result()
}

pub fn validate_note(draft: &NoteDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_text(&mut errors, "title", &draft.title, Some(MAX_TITLE_LEN));
    check_text(&mut errors, "body", &draft.body, None);

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            identifier: "alice".to_string(),
            password: "pw1".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn test_identifier_limits() {
        let mut reg = registration();
        reg.identifier = "a".repeat(MAX_IDENTIFIER_LEN);
        assert!(validate_registration(&reg).is_ok());

        reg.identifier = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        let errors = validate_registration(&reg).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::TooLong {
                field: "username",
                max: MAX_IDENTIFIER_LEN
            }]
        );
    }

    #[test]
    fn test_identifier_must_be_url_safe() {
        let mut reg = registration();
        for ok in ["alice", "al_ice-1", "a.b", "A9"] {
            reg.identifier = ok.to_string();
            assert!(validate_registration(&reg).is_ok(), "{ok} should be accepted");
        }

        for bad in ["a/b", "who?me", "x#y", "50%", "a b", "..", "-lead", "ünï"] {
            reg.identifier = bad.to_string();
            let errors = validate_registration(&reg).unwrap_err();
            assert_eq!(
                errors.errors(),
                &[ValidationError::InvalidCharacters { field: "username" }],
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_whitespace_password_is_not_empty() {
        let mut reg = registration();
        reg.password = "   ".to_string();
        assert!(validate_registration(&reg).is_ok());
        assert!(validate_login("alice", "   ").is_ok());

        reg.password = String::new();
        assert!(validate_registration(&reg).unwrap_err().has_field("password"));
    }

    #[test]
    fn test_collects_every_field_notice() {
        let reg = Registration {
            identifier: String::new(),
            password: String::new(),
            email: "not-an-email".to_string(),
            first_name: "x".repeat(MAX_NAME_LEN + 1),
            last_name: "   ".to_string(),
        };

        let errors = validate_registration(&reg).unwrap_err();
        assert_eq!(errors.errors().len(), 5);
        assert!(errors.has_field("username"));
        assert!(errors.has_field("password"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("first_name"));
        assert!(errors.has_field("last_name"));
    }

    #[test]
    fn test_email_format_and_length() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
        assert!(!is_valid_email("a@@c.com"));

        let mut reg = registration();
        reg.email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        let errors = validate_registration(&reg).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN
            }]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut reg = registration();
        reg.first_name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_registration(&reg).is_ok());
    }

    #[test]
    fn test_note_validation() {
        assert!(validate_note(&NoteDraft::new("T", "B")).is_ok());

        let errors = validate_note(&NoteDraft::new("", "")).unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("body"));

        let long_title = "t".repeat(MAX_TITLE_LEN + 1);
        let errors = validate_note(&NoteDraft::new(long_title, "B")).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_login_validation() {
        assert!(validate_login("alice", "pw1").is_ok());
        assert!(validate_login("", "pw1").unwrap_err().has_field("username"));
        assert!(validate_login("alice", "").unwrap_err().has_field("password"));
    }
}
