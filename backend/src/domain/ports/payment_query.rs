//! Driving port for payment history.

use async_trait::async_trait;

use crate::domain::{AdminPaymentView, Error, Identity, PaymentWithMeal};

/// Inbound contract for payment listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentQuery: Send + Sync {
    /// The caller's payments with bookings expanded, newest first.
    async fn history(&self, caller: &Identity) -> Result<Vec<PaymentWithMeal>, Error>;

    /// Every payment with booking and payer expanded, newest first. Admin only.
    async fn list_all(&self, caller: &Identity) -> Result<Vec<AdminPaymentView>, Error>;
}
