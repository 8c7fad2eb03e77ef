//! Driving ports for profile reads and edits.

use async_trait::async_trait;

use crate::domain::{Error, Identity, ProfileUpdate, UserProfile};

/// Inbound contract for reading profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// The caller's own profile.
    async fn profile(&self, caller: &Identity) -> Result<UserProfile, Error>;

    /// Every registered user, newest first. Admin only.
    async fn list_users(&self, caller: &Identity) -> Result<Vec<UserProfile>, Error>;
}

/// Inbound contract for editing the caller's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Apply `update` and return the stored profile.
    async fn update_profile(&self, caller: &Identity, update: ProfileUpdate) -> Result<UserProfile, Error>;
}
