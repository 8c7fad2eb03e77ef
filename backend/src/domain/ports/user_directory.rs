//! Port for reading and editing user records.
//!
//! Accounts are created by the identity provider; the ledger reads them for
//! profile views and admin joins and may update name and phone.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{ProfileUpdate, UserContact, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Lookup and profile edits for registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a full profile.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError>;

    /// Contact projections for the given users. Unknown ids are absent from
    /// the returned map.
    async fn find_contacts(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, UserContact>, UserDirectoryError>;

    /// Every registered user, newest first.
    async fn list_all(&self) -> Result<Vec<UserProfile>, UserDirectoryError>;

    /// Apply `update` and return the stored profile, or `None` when the user
    /// does not exist.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserDirectoryError>;
}

/// Fixture directory with no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_by_id(&self, _user_id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(None)
    }

    async fn find_contacts(
        &self,
        _user_ids: &[UserId],
    ) -> Result<HashMap<UserId, UserContact>, UserDirectoryError> {
        Ok(HashMap::new())
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, UserDirectoryError> {
        Ok(Vec::new())
    }

    async fn update_profile(
        &self,
        _user_id: &UserId,
        _update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_returns_no_contacts() {
        let contacts = FixtureUserDirectory
            .find_contacts(&[UserId::random()])
            .await
            .expect("fixture lookup succeeds");
        assert!(contacts.is_empty());
    }
}
