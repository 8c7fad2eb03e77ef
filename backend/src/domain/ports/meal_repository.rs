//! Port for booking persistence.

use async_trait::async_trait;

use crate::domain::{Meal, MealId, PaymentStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum MealRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "meal repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "meal repository query failed: {message}",
        /// The booking cannot return to `pending` while a completed payment
        /// references it.
        SettledByPayment { meal_id: MealId } =>
            "meal {meal_id} has a completed payment",
    }
}

/// Storage for meal bookings.
///
/// Listings are ordered newest first by `createdAt`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Persist a new booking.
    async fn insert(&self, meal: &Meal) -> Result<(), MealRepositoryError>;

    /// Fetch a booking by identifier.
    async fn find_by_id(&self, meal_id: &MealId) -> Result<Option<Meal>, MealRepositoryError>;

    /// Bookings owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Meal>, MealRepositoryError>;

    /// Every booking, newest first.
    async fn list_all(&self) -> Result<Vec<Meal>, MealRepositoryError>;

    /// Overwrite the payment status, returning the updated booking or `None`
    /// when the identifier does not resolve.
    ///
    /// Moving a booking to `pending` fails with
    /// [`MealRepositoryError::SettledByPayment`] while a completed payment
    /// references it, so a booking never carries two completed payments.
    async fn update_status(
        &self,
        meal_id: &MealId,
        status: PaymentStatus,
    ) -> Result<Option<Meal>, MealRepositoryError>;
}

/// Fixture repository holding no bookings and discarding writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMealRepository;

#[async_trait]
impl MealRepository for FixtureMealRepository {
    async fn insert(&self, _meal: &Meal) -> Result<(), MealRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _meal_id: &MealId) -> Result<Option<Meal>, MealRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Meal>, MealRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Meal>, MealRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        _meal_id: &MealId,
        _status: PaymentStatus,
    ) -> Result<Option<Meal>, MealRepositoryError> {
        Ok(None)
    }
}
