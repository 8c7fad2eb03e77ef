//! Driving port for booking mutations.

use async_trait::async_trait;

use crate::domain::{BookingReceipt, BookingRequest, Error, Identity, Meal, MealId, PaymentStatus};

/// Inbound contract for creating bookings and overriding their status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Validate and persist a pending booking owned by the caller.
    async fn create(&self, caller: &Identity, request: BookingRequest) -> Result<BookingReceipt, Error>;

    /// Admin override of a booking's payment status.
    async fn update_status(
        &self,
        caller: &Identity,
        meal_id: &MealId,
        status: PaymentStatus,
    ) -> Result<Meal, Error>;
}
