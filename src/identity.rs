//! Acting-principal types supplied by the external authentication layer.
//!
//! The marketplace never issues or verifies credentials. Every operation
//! receives an [`Actor`] that the request layer has already authenticated,
//! and the core trusts that identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a marketplace user (poster, provider, or admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role granted to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Posts tasks and reviews providers.
    User,
    /// Bids on tasks and accumulates reputation.
    Provider,
    /// Moderates tasks.
    Admin,
}

impl UserRole {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for UserRole {
    type Error = ParseUserRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "provider" => Ok(Self::Provider),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseUserRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);

/// Authenticated principal performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    role: UserRole,
}

impl Actor {
    /// Creates an actor from a trusted identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns `true` when the actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::{UserRole, UserRole::*};
    use rstest::rstest;

    #[rstest]
    #[case("user", User)]
    #[case(" Provider ", Provider)]
    #[case("ADMIN", Admin)]
    fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: UserRole) {
        assert_eq!(UserRole::try_from(raw), Ok(expected));
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert!(UserRole::try_from("moderator").is_err());
    }
}
