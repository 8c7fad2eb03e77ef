//! PostgreSQL-backed `MealRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::{exists, not};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MealRepository, MealRepositoryError};
use crate::domain::{Meal, MealId, PaymentRecordStatus, PaymentStatus, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MealRow, NewMealRow};
use super::pool::{DbPool, PoolError};
use super::schema::{meals, payments};

/// Diesel-backed implementation of the `MealRepository` port.
#[derive(Clone)]
pub struct DieselMealRepository {
    pool: DbPool,
}

impl DieselMealRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MealRepositoryError {
    map_basic_pool_error(error, MealRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MealRepositoryError {
    map_basic_diesel_error(
        error,
        MealRepositoryError::query,
        MealRepositoryError::connection,
    )
}

fn rows_to_meals(rows: Vec<MealRow>) -> Result<Vec<Meal>, MealRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_meal().map_err(MealRepositoryError::query))
        .collect()
}

#[async_trait]
impl MealRepository for DieselMealRepository {
    async fn insert(&self, meal: &Meal) -> Result<(), MealRepositoryError> {
        let row = NewMealRow::from_meal(meal).map_err(MealRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(meals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, meal_id: &MealId) -> Result<Option<Meal>, MealRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MealRow> = meals::table
            .find(meal_id.as_uuid())
            .select(MealRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row.into_meal().map_err(MealRepositoryError::query))
            .transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Meal>, MealRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MealRow> = meals::table
            .filter(meals::user_id.eq(user_id.as_uuid()))
            .order_by((meals::created_at.desc(), meals::id))
            .select(MealRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_meals(rows)
    }

    async fn list_all(&self) -> Result<Vec<Meal>, MealRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MealRow> = meals::table
            .order_by((meals::created_at.desc(), meals::id))
            .select(MealRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_meals(rows)
    }

    async fn update_status(
        &self,
        meal_id: &MealId,
        status: PaymentStatus,
    ) -> Result<Option<Meal>, MealRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        if status != PaymentStatus::Pending {
            let row: Option<MealRow> = diesel::update(meals::table.find(meal_id.as_uuid()))
                .set(meals::payment_status.eq(status.as_str()))
                .returning(MealRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
            return row
                .map(|row| row.into_meal().map_err(MealRepositoryError::query))
                .transpose();
        }

        let completed_payment = payments::table
            .filter(payments::meal_id.eq(meal_id.as_uuid()))
            .filter(payments::status.eq(PaymentRecordStatus::Completed.as_str()));
        let reopened: Option<MealRow> = diesel::update(
            meals::table
                .find(meal_id.as_uuid())
                .filter(not(exists(completed_payment))),
        )
        .set(meals::payment_status.eq(status.as_str()))
        .returning(MealRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = reopened {
            return row.into_meal().map(Some).map_err(MealRepositoryError::query);
        }

        // Zero rows: the meal is either missing or has a completed payment.
        let known: i64 = meals::table
            .find(meal_id.as_uuid())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if known == 0 {
            Ok(None)
        } else {
            Err(MealRepositoryError::settled_by_payment(*meal_id))
        }
    }
}
