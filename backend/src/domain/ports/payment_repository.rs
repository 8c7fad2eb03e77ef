//! Port for payment persistence and atomic settlement.

use async_trait::async_trait;

use crate::domain::{Meal, MealId, Payment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "payment repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "payment repository query failed: {message}",
        /// The booking named by the payment does not exist.
        MealNotFound { meal_id: MealId } =>
            "meal {meal_id} not found",
        /// The payer does not own the booking.
        NotOwner { meal_id: MealId } =>
            "meal {meal_id} is owned by another user",
        /// The booking already has a completed payment.
        AlreadySettled { meal_id: MealId } =>
            "meal {meal_id} is already settled",
    }
}

/// Storage for payment records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert `payment` and flip its booking to `completed` in one transaction.
    ///
    /// The booking update is conditional on the booking still being
    /// `pending`, so of two concurrent settlements only one succeeds; the
    /// other observes [`PaymentRepositoryError::AlreadySettled`]. Returns the
    /// updated booking.
    async fn settle(&self, payment: &Payment) -> Result<Meal, PaymentRepositoryError>;

    /// Payments made by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Every payment, newest first.
    async fn list_all(&self) -> Result<Vec<Payment>, PaymentRepositoryError>;
}

/// Fixture repository that refuses settlement and lists nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentRepository;

#[async_trait]
impl PaymentRepository for FixturePaymentRepository {
    async fn settle(&self, payment: &Payment) -> Result<Meal, PaymentRepositoryError> {
        Err(PaymentRepositoryError::meal_not_found(payment.meal_id))
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Payment>, PaymentRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Payment>, PaymentRepositoryError> {
        Ok(Vec::new())
    }
}
