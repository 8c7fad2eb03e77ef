//! Booking ledger and reconciliation services.
//!
//! Implements [`BookingCommand`] and [`BookingQuery`] over the meal
//! repository and user directory. "Today" is always the UTC calendar date of
//! the injected clock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    BookingCommand, BookingQuery, MealRepository, MealRepositoryError, UserDirectory,
    UserDirectoryError,
};
use crate::domain::reconciliation::{self, BookingFilter, DashboardStats, PhaseCounts};
use crate::domain::{
    BookingPlan, BookingReceipt, BookingRequest, BookingValidationError, Error, Identity, Meal,
    MealId, MealWithOwner, PaymentStatus, UserContact, UserId,
};

/// Booking service implementing the booking driving ports.
#[derive(Clone)]
pub struct BookingService<M, U> {
    meals: Arc<M>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<M, U> BookingService<M, U> {
    /// Create a new service over the given repositories.
    pub fn new(meals: Arc<M>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            meals,
            users,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

pub(crate) fn map_meal_error(error: MealRepositoryError) -> Error {
    debug!(%error, "meal repository failure");
    match error {
        MealRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("meal repository unavailable: {message}"))
        }
        MealRepositoryError::Query { message } => {
            Error::internal(format!("meal repository error: {message}"))
        }
        MealRepositoryError::SettledByPayment { meal_id } => {
            Error::conflict("Meal booking has a completed payment and cannot be reopened")
                .with_details(json!({
                    "mealId": meal_id,
                    "code": "booking_has_completed_payment",
                }))
        }
    }
}

pub(crate) fn map_user_error(error: UserDirectoryError) -> Error {
    debug!(%error, "user directory failure");
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn validation_error(error: &BookingValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

/// Distinct user ids in first-seen order.
pub(crate) fn distinct_users(ids: impl IntoIterator<Item = UserId>) -> Vec<UserId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn join_owners(meals: Vec<Meal>, contacts: &HashMap<UserId, UserContact>) -> Vec<MealWithOwner> {
    meals
        .into_iter()
        .map(|meal| MealWithOwner {
            user: contacts.get(&meal.user_id).cloned(),
            meal,
        })
        .collect()
}

#[async_trait]
impl<M, U> BookingCommand for BookingService<M, U>
where
    M: MealRepository,
    U: UserDirectory,
{
    async fn create(&self, caller: &Identity, request: BookingRequest) -> Result<BookingReceipt, Error> {
        let plan = BookingPlan::new(&request, self.today()).map_err(|err| validation_error(&err))?;
        let meal = Meal::book(&plan, *caller.user_id(), self.clock.utc());
        self.meals.insert(&meal).await.map_err(map_meal_error)?;

        info!(
            meal_id = %meal.id,
            user_id = %meal.user_id,
            total_amount = meal.total_amount,
            "meal booked"
        );
        Ok(BookingReceipt::from(meal))
    }

    async fn update_status(
        &self,
        caller: &Identity,
        meal_id: &MealId,
        status: PaymentStatus,
    ) -> Result<Meal, Error> {
        caller.require_admin()?;
        let meal = self
            .meals
            .update_status(meal_id, status)
            .await
            .map_err(map_meal_error)?
            .ok_or_else(|| Error::not_found("Meal not found"))?;

        info!(
            meal_id = %meal.id,
            admin_id = %caller.user_id(),
            status = status.as_str(),
            "meal status overridden"
        );
        Ok(meal)
    }
}

#[async_trait]
impl<M, U> BookingQuery for BookingService<M, U>
where
    M: MealRepository,
    U: UserDirectory,
{
    async fn list_own(&self, caller: &Identity) -> Result<Vec<Meal>, Error> {
        self.meals
            .list_for_user(caller.user_id())
            .await
            .map_err(map_meal_error)
    }

    async fn list_all(&self, caller: &Identity, filter: BookingFilter) -> Result<Vec<MealWithOwner>, Error> {
        caller.require_admin()?;
        let meals = self.meals.list_all().await.map_err(map_meal_error)?;
        let owners = distinct_users(meals.iter().map(|meal| meal.user_id));
        let contacts = self
            .users
            .find_contacts(&owners)
            .await
            .map_err(map_user_error)?;

        let joined = join_owners(meals, &contacts);
        if filter.is_empty() {
            return Ok(joined);
        }
        Ok(joined.into_iter().filter(|entry| filter.matches(entry)).collect())
    }

    async fn summary(&self, caller: &Identity) -> Result<PhaseCounts, Error> {
        let meals = self
            .meals
            .list_for_user(caller.user_id())
            .await
            .map_err(map_meal_error)?;
        Ok(reconciliation::phase_counts(&meals, self.today()))
    }

    async fn dashboard(&self, caller: &Identity) -> Result<DashboardStats, Error> {
        caller.require_admin()?;
        let meals = self.meals.list_all().await.map_err(map_meal_error)?;
        Ok(reconciliation::dashboard_stats(&meals, self.today()))
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
