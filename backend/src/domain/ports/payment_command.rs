//! Driving port for settlement.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Settlement, SettlementRequest};

/// Inbound contract for settling a booking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Record a completed payment for a booking the caller owns.
    ///
    /// Fails with `not_found` for unknown bookings, `forbidden` when the
    /// caller is not the owner and `conflict` when the booking is already
    /// settled.
    async fn settle(&self, caller: &Identity, request: SettlementRequest) -> Result<Settlement, Error>;
}
