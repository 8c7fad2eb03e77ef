//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.
//!
//! Settlement runs in one transaction: a conditional update flips the meal
//! from `pending` to `completed` for its owner, then the payment row is
//! inserted. A zero-row update is classified by re-reading the meal. The
//! partial unique index on completed payments backs the same guarantee.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{Meal, MealId, Payment, PaymentStatus, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MealRow, NewPaymentRow, PaymentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{meals, payments};

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Transaction failure: either a database error or a settlement rejection
/// detected inside the transaction.
#[derive(Debug)]
enum SettleFailure {
    Database(DieselError),
    Rejected(PaymentRepositoryError),
}

impl From<DieselError> for SettleFailure {
    fn from(error: DieselError) -> Self {
        Self::Database(error)
    }
}

fn map_pool_error(error: PoolError) -> PaymentRepositoryError {
    map_basic_pool_error(error, PaymentRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> PaymentRepositoryError {
    map_basic_diesel_error(
        error,
        PaymentRepositoryError::query,
        PaymentRepositoryError::connection,
    )
}

fn map_settle_failure(failure: SettleFailure, meal_id: MealId) -> PaymentRepositoryError {
    match failure {
        SettleFailure::Rejected(error) => error,
        SettleFailure::Database(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _,
        )) => PaymentRepositoryError::already_settled(meal_id),
        SettleFailure::Database(error) => map_diesel_error(error),
    }
}

/// Explain why the conditional update matched no rows.
async fn classify_rejection(
    conn: &mut AsyncPgConnection,
    meal_id: MealId,
    payer: UserId,
) -> Result<PaymentRepositoryError, DieselError> {
    let row: Option<MealRow> = meals::table
        .find(meal_id.as_uuid())
        .select(MealRow::as_select())
        .first(conn)
        .await
        .optional()?;

    Ok(match row {
        None => PaymentRepositoryError::meal_not_found(meal_id),
        Some(row) if row.user_id != *payer.as_uuid() => PaymentRepositoryError::not_owner(meal_id),
        Some(_) => PaymentRepositoryError::already_settled(meal_id),
    })
}

fn rows_to_payments(rows: Vec<PaymentRow>) -> Result<Vec<Payment>, PaymentRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_payment().map_err(PaymentRepositoryError::query))
        .collect()
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn settle(&self, payment: &Payment) -> Result<Meal, PaymentRepositoryError> {
        let new_row = NewPaymentRow::from_payment(payment).map_err(PaymentRepositoryError::query)?;
        let meal_id = payment.meal_id;
        let payer = payment.user_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction::<MealRow, SettleFailure, _>(|conn| {
                async move {
                    let updated: Option<MealRow> = diesel::update(
                        meals::table
                            .filter(meals::id.eq(meal_id.as_uuid()))
                            .filter(meals::user_id.eq(payer.as_uuid()))
                            .filter(meals::payment_status.eq(PaymentStatus::Pending.as_str())),
                    )
                    .set(meals::payment_status.eq(PaymentStatus::Completed.as_str()))
                    .returning(MealRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(meal_row) = updated else {
                        let rejection = classify_rejection(conn, meal_id, payer).await?;
                        return Err(SettleFailure::Rejected(rejection));
                    };

                    diesel::insert_into(payments::table)
                        .values(&new_row)
                        .execute(conn)
                        .await?;
                    Ok(meal_row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|failure| map_settle_failure(failure, meal_id))?;

        row.into_meal().map_err(PaymentRepositoryError::query)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PaymentRow> = payments::table
            .filter(payments::user_id.eq(user_id.as_uuid()))
            .order_by((payments::created_at.desc(), payments::id))
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_payments(rows)
    }

    async fn list_all(&self) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PaymentRow> = payments::table
            .order_by((payments::created_at.desc(), payments::id))
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_payments(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejection_passes_through() {
        let meal_id = MealId::random();
        let err = map_settle_failure(
            SettleFailure::Rejected(PaymentRepositoryError::not_owner(meal_id)),
            meal_id,
        );
        assert_eq!(err, PaymentRepositoryError::NotOwner { meal_id });
    }

    #[rstest]
    fn missing_row_maps_to_query_error() {
        let err = map_settle_failure(SettleFailure::Database(DieselError::NotFound), MealId::random());
        assert!(matches!(err, PaymentRepositoryError::Query { .. }));
    }
}
