//! Verified caller identity and the admin gate.

use super::{Error, Role, UserId};

/// Identity asserted by a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
}

impl Identity {
    /// Build an identity from a verified subject and role.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Subject identifier.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Capability level.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Reject non-admin callers with [`crate::domain::ErrorCode::Forbidden`].
    ///
    /// # Examples
    /// ```
    /// use meal_ledger::domain::{ErrorCode, Identity, Role, UserId};
    ///
    /// let member = Identity::new(UserId::random(), Role::Member);
    /// let err = member.require_admin().expect_err("members are rejected");
    /// assert_eq!(err.code(), ErrorCode::Forbidden);
    /// ```
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("Access denied. Admin privileges required."))
        }
    }
}
