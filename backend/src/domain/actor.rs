//! Authenticated actors and the roles they act under.
//!
//! Roles arrive as free-form labels from the identity collaborator. Known
//! labels map onto named variants; anything else is kept verbatim so an
//! escalation aimed at an unmapped role can fail with `NotFound` instead of
//! being rejected up front.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

/// Numeric user identifier issued by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role label attached to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Faculty,
    Hod,
    Principal,
    Admin,
    SuperAdmin,
    /// A label no variant above recognises, stored lower-cased.
    Other(String),
}

impl Role {
    /// Normalise a raw label. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use grievance::domain::Role;
    ///
    /// assert_eq!(Role::parse(" Principal "), Role::Principal);
    /// assert_eq!(Role::parse("dean"), Role::Other("dean".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "student" => Self::Student,
            "faculty" => Self::Faculty,
            "hod" => Self::Hod,
            "principal" => Self::Principal,
            "admin" => Self::Admin,
            "super_admin" => Self::SuperAdmin,
            _ => Self::Other(label),
        }
    }

    /// Canonical stored label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Hod => "hod",
            Self::Principal => "principal",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Whether the role may manage complaints it does not own.
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            Self::Faculty | Self::Hod | Self::Principal | Self::Admin | Self::SuperAdmin
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// The authenticated caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    username: String,
    role: Role,
}

impl Actor {
    pub fn new(id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Fail with `Forbidden` unless the actor holds a staff role.
    pub fn require_staff(&self) -> Result<(), Error> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "role '{}' may not manage complaints",
                self.role
            )))
        }
    }

    /// Allow the user themselves or any staff member.
    pub fn require_self_or_staff(&self, user: UserId) -> Result<(), Error> {
        if self.id == user || self.is_staff() {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "user {} may not read another user's complaints",
                self.id
            )))
        }
    }

    /// Fail with `Forbidden` when a staff member tries to act as a submitter.
    pub fn require_submitter(&self) -> Result<(), Error> {
        if self.is_staff() {
            Err(Error::forbidden(format!(
                "role '{}' may not submit complaints",
                self.role
            )))
        } else {
            Ok(())
        }
    }
}
