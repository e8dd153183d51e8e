//! Session record and the identity snapshot derived from it.
//!
//! DESIGN
//! ======
//! `UserSession` is the only thing ever persisted: it is serialized to JSON
//! and handed to the protected store as an opaque value. `IdentitySnapshot`
//! is never stored. It is rebuilt from the session on every query, and both
//! the read path and the write path go through `IdentitySnapshot::from_session`
//! so a freshly published snapshot equals the one a later read derives.

use serde::{Deserialize, Serialize};

/// Authentication type attached to every authenticated snapshot.
pub const AUTHENTICATION_TYPE: &str = "session";

// =============================================================================
// USER SESSION
// =============================================================================

/// Session record written on login and deleted on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub username: String,
    pub role: String,
}

impl UserSession {
    #[must_use]
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self { username: username.into(), role: role.into() }
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Name,
    Role,
}

/// A single named attribute of an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub kind: ClaimType,
    pub value: String,
}

impl Claim {
    #[must_use]
    pub fn new(kind: ClaimType, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }
}

// =============================================================================
// IDENTITY SNAPSHOT
// =============================================================================

/// Current authenticated-or-anonymous state of one browser session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    /// `None` for the anonymous identity.
    pub authentication_type: Option<String>,
    pub claims: Vec<Claim>,
}

impl IdentitySnapshot {
    /// The anonymous identity: no authentication type, no claims.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated identity whose claims mirror the session 1:1.
    #[must_use]
    pub fn from_session(session: &UserSession) -> Self {
        Self {
            authentication_type: Some(AUTHENTICATION_TYPE.to_owned()),
            claims: vec![
                Claim::new(ClaimType::Name, session.username.clone()),
                Claim::new(ClaimType::Role, session.role.clone()),
            ],
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type.is_some()
    }

    /// First claim of the given type, if any.
    #[must_use]
    pub fn claim(&self, kind: ClaimType) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.value.as_str())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.claim(ClaimType::Name)
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.claim(ClaimType::Role)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.claims
            .iter()
            .any(|c| c.kind == ClaimType::Role && c.value == role)
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
