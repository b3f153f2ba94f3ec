//! One method per inbound action. Each takes the request's resolved
//! [`RequestContext`] explicitly and returns where the browser goes next.

use crate::auth::{
    authorize, Account, AuthError, CredentialStore, Identity, Note, NoteDraft, Registration,
    SessionManager, SessionToken,
};
use crate::validation::validate_login;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const LANDING: &str = "/";
pub const DENIED_MESSAGE: &str = "You are not authorized to view that page.";

pub fn profile_location(identifier: &str) -> String {
    format!("/users/{}", identifier)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Danger,
}

/// A one-shot notice shown on the page the browser is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// What an action did to the browser's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    Unchanged,
    Started(SessionToken),
    Ended,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Redirect {
        location: String,
        flash: Option<Flash>,
        session: SessionChange,
    },
    Profile {
        account: Account,
        notes: Vec<Note>,
    },
}

impl Outcome {
    fn redirect(location: impl Into<String>, flash: Option<Flash>) -> Self {
        Outcome::Redirect {
            location: location.into(),
            flash,
            session: SessionChange::Unchanged,
        }
    }

    /// Where every DENY lands. The notice is the same whatever was asked for.
    pub fn denied() -> Self {
        Self::redirect(LANDING, Some(Flash::new(FlashKind::Danger, DENIED_MESSAGE)))
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Outcome::Redirect { location, .. } => Some(location),
            Outcome::Profile { .. } => None,
        }
    }
}

/// Per-request state, resolved once from the session token and passed to every action.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub token: Option<SessionToken>,
    pub client_ip: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[derive(Clone)]
pub struct NotesService {
    credentials: Arc<CredentialStore>,
    sessions: SessionManager,
}

impl NotesService {
    pub fn new(credentials: Arc<CredentialStore>, sessions: SessionManager) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Turn a presented token into the request's context.
    ///
    /// The identity is checked against the store every time; a session whose
    /// account no longer exists is ended and the request treated as anonymous.
    pub async fn resolve(
        &self,
        token: Option<SessionToken>,
        client_ip: Option<String>,
    ) -> Result<RequestContext, AuthError> {
        let mut context = RequestContext {
            identity: None,
            token,
            client_ip,
        };

        let Some(token) = context.token.as_ref() else {
            return Ok(context);
        };
        let Some(identifier) = self.sessions.current(token).await? else {
            return Ok(context);
        };

        match self.credentials.find_account(&identifier).await {
            Ok(account) => context.identity = Some(Identity::new(account.identifier)),
            Err(AuthError::AccountNotFound) => {
                warn!(identifier = %identifier, "session pointed at a missing account, ending it");
                self.sessions.end(token).await?;
            }
            Err(e) => return Err(e),
        }

        Ok(context)
    }

    pub async fn register(
        &self,
        context: &RequestContext,
        registration: Registration,
    ) -> Result<Outcome, AuthError> {
        if let Some(identity) = context.identity() {
            return Ok(Outcome::redirect(profile_location(identity.as_str()), None));
        }

        let account = self.credentials.register(registration).await?;
        let session = self
            .sessions
            .start(
                context.token.as_ref(),
                &account.identifier,
                context.client_ip.clone(),
            )
            .await?;

        Ok(Outcome::Redirect {
            location: profile_location(&account.identifier),
            flash: Some(Flash::new(
                FlashKind::Success,
                format!("Welcome, {}! Your account has been created.", account.first_name),
            )),
            session: SessionChange::Started(session.token),
        })
    }

    pub async fn login(
        &self,
        context: &RequestContext,
        identifier: &str,
        password: &str,
    ) -> Result<Outcome, AuthError> {
        if let Some(identity) = context.identity() {
            return Ok(Outcome::redirect(profile_location(identity.as_str()), None));
        }

        let identifier = identifier.trim();
        validate_login(identifier, password)?;

        let Some(account) = self.credentials.authenticate(identifier, password).await? else {
            info!(identifier, "login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let session = self
            .sessions
            .start(
                context.token.as_ref(),
                &account.identifier,
                context.client_ip.clone(),
            )
            .await?;
        info!(identifier = %account.identifier, "logged in");

        Ok(Outcome::Redirect {
            location: profile_location(&account.identifier),
            flash: Some(Flash::new(
                FlashKind::Success,
                format!("Welcome back, {}!", account.identifier),
            )),
            session: SessionChange::Started(session.token),
        })
    }

    pub async fn logout(&self, context: &RequestContext) -> Result<Outcome, AuthError> {
        if let Some(token) = context.token.as_ref() {
            self.sessions.end(token).await?;
        }
        if let Some(identity) = context.identity() {
            info!(identifier = %identity, "logged out");
        }

        Ok(Outcome::Redirect {
            location: LANDING.to_string(),
            flash: Some(Flash::new(FlashKind::Info, "You have been logged out.")),
            session: SessionChange::Ended,
        })
    }

    pub async fn view_profile(
        &self,
        context: &RequestContext,
        identifier: &str,
    ) -> Result<Outcome, AuthError> {
        authorize(context.identity(), identifier)?;

        let account = self.credentials.find_account(identifier).await?;
        let notes = self.credentials.list_notes(identifier).await?;

        Ok(Outcome::Profile { account, notes })
    }

    pub async fn delete_account(
        &self,
        context: &RequestContext,
        identifier: &str,
    ) -> Result<Outcome, AuthError> {
        authorize(context.identity(), identifier)?;

        self.credentials
            .delete_account(identifier, &self.sessions)
            .await?;

        Ok(Outcome::Redirect {
            location: LANDING.to_string(),
            flash: Some(Flash::new(FlashKind::Info, "Your account has been deleted.")),
            session: SessionChange::Ended,
        })
    }

    pub async fn add_note(
        &self,
        context: &RequestContext,
        owner: &str,
        draft: NoteDraft,
    ) -> Result<Outcome, AuthError> {
        let identity = authorize(context.identity(), owner)?;

        let note = self.credentials.create_note(identity.as_str(), draft).await?;
        info!(owner = %note.owner, note_id = note.id, "note created");

        Ok(Outcome::redirect(
            profile_location(&note.owner),
            Some(Flash::new(FlashKind::Success, "Note added.")),
        ))
    }

    /// Fetch first (not-found wins), then check ownership, then write.
    pub async fn update_note(
        &self,
        context: &RequestContext,
        id: u64,
        draft: NoteDraft,
    ) -> Result<Outcome, AuthError> {
        let note = self.credentials.find_note(id).await?;
        authorize(context.identity(), &note.owner)?;

        let note = self.credentials.update_note(id, draft).await?;

        Ok(Outcome::redirect(
            profile_location(&note.owner),
            Some(Flash::new(FlashKind::Success, "Note updated.")),
        ))
    }

    /// Same ordering as `update_note`: the note is loaded before its owner is compared.
    pub async fn delete_note(&self, context: &RequestContext, id: u64) -> Result<Outcome, AuthError> {
        let note = self.credentials.find_note(id).await?;
        authorize(context.identity(), &note.owner)?;

        self.credentials.delete_note(id).await?;
        info!(owner = %note.owner, note_id = id, "note deleted");

        Ok(Outcome::redirect(
            profile_location(&note.owner),
            Some(Flash::new(FlashKind::Success, "Note deleted.")),
        ))
    }
}
