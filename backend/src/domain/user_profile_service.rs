//! Profile service over the user directory.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::booking_service::map_user_error;
use crate::domain::ports::{UserDirectory, UserProfileCommand, UserProfileQuery};
use crate::domain::{Error, Identity, ProfileUpdate, UserProfile};

const USER_NOT_FOUND: &str = "User not found";

/// Profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct UserProfileService<U> {
    users: Arc<U>,
}

impl<U> UserProfileService<U> {
    /// Create a new service over the given directory.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UserProfileQuery for UserProfileService<U>
where
    U: UserDirectory,
{
    async fn profile(&self, caller: &Identity) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(caller.user_id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn list_users(&self, caller: &Identity) -> Result<Vec<UserProfile>, Error> {
        caller.require_admin()?;
        self.users.list_all().await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U> UserProfileCommand for UserProfileService<U>
where
    U: UserDirectory,
{
    async fn update_profile(&self, caller: &Identity, update: ProfileUpdate) -> Result<UserProfile, Error> {
        if update.is_empty() {
            return self.profile(caller).await;
        }
        let profile = self
            .users
            .update_profile(caller.user_id(), &update)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        info!(user_id = %profile.id, "profile updated");
        Ok(profile)
    }
}
