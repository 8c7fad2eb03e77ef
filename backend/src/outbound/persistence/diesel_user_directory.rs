//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{ProfileUpdate, UserContact, UserId, UserProfile};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserDirectory` port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or replace a user record as the identity provider would.
    ///
    /// Used to seed local databases and integration tests.
    pub async fn register_user(&self, profile: &UserProfile) -> Result<(), UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *profile.id.as_uuid(),
            name: &profile.name,
            email: &profile.email,
            role: profile.role.as_str(),
            phone: &profile.phone,
            identity_proof: profile.identity_proof.as_deref(),
            created_at: profile.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::id)
            .do_update()
            .set((
                users::name.eq(row.name),
                users::email.eq(row.email),
                users::role.eq(row.role),
                users::phone.eq(row.phone),
                users::identity_proof.eq(row.identity_proof),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    map_basic_pool_error(error, UserDirectoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

fn row_to_profile(row: UserRow) -> Result<UserProfile, UserDirectoryError> {
    row.into_profile().map_err(UserDirectoryError::query)
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(user_id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn find_contacts(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, UserContact>, UserDirectoryError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(Uuid, String, String, String)> = users::table
            .filter(users::id.eq_any(ids))
            .select((users::id, users::name, users::email, users::phone))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, email, phone)| (UserId::from_uuid(id), UserContact { name, email, phone }))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order_by((users::created_at.desc(), users::id))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_profile).collect()
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        if update.is_empty() {
            return self.find_by_id(user_id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserProfileChangeset {
            name: update.name(),
            phone: update.phone(),
        };

        let row: Option<UserRow> = diesel::update(users::table.find(user_id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }
}
