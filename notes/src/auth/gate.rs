//! Ownership gate consulted before every state-changing or identity-scoped read.
//!
//! The policy is a single rule: a request is allowed iff it carries a session
//! identity and that identity equals the identity the resource requires (a
//! note's owner, or the account named in a profile route).

use super::error::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The acting identity of one request, resolved once from its session and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn decide(current: Option<&Identity>, required: &str) -> Decision {
    match current {
        Some(identity) if identity.as_str() == required => Decision::Allow,
        _ => Decision::Deny,
    }
}

/// `decide` as a guard: hands back the acting identity on ALLOW, `Unauthorized` on DENY.
pub fn authorize<'a>(current: Option<&'a Identity>, required: &str) -> Result<&'a Identity, AuthError> {
    match (decide(current, required), current) {
        (Decision::Allow, Some(identity)) => Ok(identity),
        _ => {
            tracing::info!(
                actor = current.map(Identity::as_str).unwrap_or("<anonymous>"),
                required,
                "authorization denied"
            );
            Err(AuthError::Unauthorized)
        }
    }
}
