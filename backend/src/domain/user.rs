//! Users as seen by the ledger.
//!
//! Accounts are issued by the identity provider; the ledger only reads them
//! for profile views and admin joins, and lets members edit their name and
//! phone number.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised while parsing user identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use meal_ledger::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Capability level carried by an identity assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May act only on records it owns.
    #[serde(alias = "user")]
    Member,
    /// May read every record and override booking status.
    Admin,
}

impl Role {
    /// Lowercase storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Parse the stored representation, accepting `user` as a member alias.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "member" | "user" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Minimal user projection attached to admin views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContact {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

/// Full profile of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identifier assigned by the identity provider.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Capability level.
    pub role: Role,
    /// Contact phone number.
    pub phone: String,
    /// Reference path of the uploaded identity proof.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_proof: Option<String>,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Project the profile onto the contact fields used in admin joins.
    #[must_use]
    pub fn contact(&self) -> UserContact {
        UserContact {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Apply a profile edit, leaving omitted fields unchanged.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(name) = update.name() {
            name.clone_into(&mut self.name);
        }
        if let Some(phone) = update.phone() {
            phone.clone_into(&mut self.phone);
        }
    }
}

/// Requested edits to the caller's own profile.
///
/// Blank values are treated as absent so clients may submit the whole form.
///
/// # Examples
/// ```
/// use meal_ledger::domain::ProfileUpdate;
///
/// let update = ProfileUpdate::new(Some("  ".into()), Some(" 555-0100 ".into()));
/// assert_eq!(update.name(), None);
/// assert_eq!(update.phone(), Some("555-0100"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    name: Option<String>,
    phone: Option<String>,
}

impl ProfileUpdate {
    /// Normalise the submitted fields.
    #[must_use]
    pub fn new(name: Option<String>, phone: Option<String>) -> Self {
        Self {
            name: normalise(name),
            phone: normalise(phone),
        }
    }

    /// New display name, if one was supplied.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// New phone number, if one was supplied.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Whether the update carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

fn normalise(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
