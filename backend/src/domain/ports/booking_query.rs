//! Driving port for booking reads.

use async_trait::async_trait;

use crate::domain::reconciliation::{BookingFilter, DashboardStats, PhaseCounts};
use crate::domain::{Error, Identity, Meal, MealWithOwner};

/// Inbound contract for booking listings and aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// The caller's bookings, newest first.
    async fn list_own(&self, caller: &Identity) -> Result<Vec<Meal>, Error>;

    /// Every booking with owner contact, filtered, newest first. Admin only.
    async fn list_all(&self, caller: &Identity, filter: BookingFilter) -> Result<Vec<MealWithOwner>, Error>;

    /// Per-tab counts over the caller's bookings.
    async fn summary(&self, caller: &Identity) -> Result<PhaseCounts, Error>;

    /// Dashboard statistics over every booking. Admin only.
    async fn dashboard(&self, caller: &Identity) -> Result<DashboardStats, Error>;
}
