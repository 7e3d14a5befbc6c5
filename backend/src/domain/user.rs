//! User identity and profile model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Identity key issued by the external identity provider.
///
/// ## Invariants
/// - Non-empty and free of surrounding whitespace.
///
/// # Examples
/// ```
/// use civic_backend::domain::UserId;
///
/// let uid = UserId::new("u1").expect("valid uid");
/// assert_eq!(uid.as_ref(), "u1");
/// assert!(UserId::new(" u1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorisation level attached to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role for every new identity.
    Citizen,
    /// Triage role allowed to run administrative operations.
    Government,
}

impl Role {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Government => "government",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{value}' (expected citizen or government)")]
pub struct ParseRoleError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(Self::Citizen),
            "government" => Ok(Self::Government),
            other => Err(ParseRoleError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Device token registered with the push delivery gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    /// Wrap a token, returning `None` when it is blank.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }
}

impl AsRef<str> for PushToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored user profile document (`users/{uid}`).
///
/// `role` is optional because profiles written by other clients may omit or
/// garble it; callers without a recognised role hold no privileges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity key the profile belongs to.
    pub uid: UserId,
    /// Display name snapshot from the identity provider.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Avatar reference.
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    /// Stored authorisation role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Registered push delivery token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_token: Option<PushToken>,
    /// Profile creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Whether the stored role matches `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// Display name suitable for denormalised snapshots, if one is set.
    pub fn non_blank_display_name(&self) -> Option<&str> {
        let trimmed = self.display_name.trim();
        (!trimmed.is_empty()).then_some(self.display_name.as_str())
    }
}
