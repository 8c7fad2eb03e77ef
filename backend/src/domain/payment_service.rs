//! Payment ledger service.
//!
//! Settlement checks existence, ownership and status up front so callers get
//! precise errors without any write, then hands the payment to the
//! repository, which repeats the status check atomically.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::booking_service::{distinct_users, map_meal_error, map_user_error};
use crate::domain::ports::{
    MealRepository, PaymentCommand, PaymentQuery, PaymentRepository, PaymentRepositoryError,
    UserDirectory,
};
use crate::domain::{
    AdminPaymentView, Error, Identity, Meal, MealId, Payment, PaymentWithMeal, Settlement,
    SettlementRequest,
};

const MEAL_NOT_FOUND: &str = "Meal booking not found";
const NOT_OWNER: &str = "Unauthorized access to this meal booking";
const ALREADY_SETTLED: &str = "Meal booking is already paid";

/// Payment service implementing the payment driving ports.
#[derive(Clone)]
pub struct PaymentService<M, P, U> {
    meals: Arc<M>,
    payments: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<M, P, U> PaymentService<M, P, U> {
    /// Create a new service over the given repositories.
    pub fn new(meals: Arc<M>, payments: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            meals,
            payments,
            users,
            clock,
        }
    }
}

fn already_settled(meal_id: MealId) -> Error {
    Error::conflict(ALREADY_SETTLED).with_details(json!({
        "mealId": meal_id,
        "code": "booking_already_settled",
    }))
}

fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            debug!(%message, "payment repository connection failure");
            Error::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            debug!(%message, "payment repository query failure");
            Error::internal(format!("payment repository error: {message}"))
        }
        PaymentRepositoryError::MealNotFound { .. } => Error::not_found(MEAL_NOT_FOUND),
        PaymentRepositoryError::NotOwner { .. } => Error::forbidden(NOT_OWNER),
        PaymentRepositoryError::AlreadySettled { meal_id } => already_settled(meal_id),
    }
}

fn index_meals(meals: Vec<Meal>) -> HashMap<MealId, Meal> {
    meals.into_iter().map(|meal| (meal.id, meal)).collect()
}

#[async_trait]
impl<M, P, U> PaymentCommand for PaymentService<M, P, U>
where
    M: MealRepository,
    P: PaymentRepository,
    U: UserDirectory,
{
    async fn settle(&self, caller: &Identity, request: SettlementRequest) -> Result<Settlement, Error> {
        let meal = self
            .meals
            .find_by_id(&request.meal_id)
            .await
            .map_err(map_meal_error)?
            .ok_or_else(|| Error::not_found(MEAL_NOT_FOUND))?;

        if !meal.is_owned_by(caller.user_id()) {
            warn!(
                meal_id = %meal.id,
                caller_id = %caller.user_id(),
                "settlement rejected: caller does not own booking"
            );
            return Err(Error::forbidden(NOT_OWNER));
        }
        if meal.is_settled() {
            return Err(already_settled(meal.id));
        }

        let payment = Payment::settling(
            &meal,
            request.payment_method,
            request.transaction_id,
            self.clock.utc(),
        );
        let meal = self
            .payments
            .settle(&payment)
            .await
            .map_err(map_payment_error)?;

        info!(
            meal_id = %meal.id,
            payment_id = %payment.id,
            amount = payment.amount,
            method = payment.payment_method.as_str(),
            "meal settled"
        );
        Ok(Settlement { payment, meal })
    }
}

#[async_trait]
impl<M, P, U> PaymentQuery for PaymentService<M, P, U>
where
    M: MealRepository,
    P: PaymentRepository,
    U: UserDirectory,
{
    async fn history(&self, caller: &Identity) -> Result<Vec<PaymentWithMeal>, Error> {
        let payments = self
            .payments
            .list_for_user(caller.user_id())
            .await
            .map_err(map_payment_error)?;
        let meals = self
            .meals
            .list_for_user(caller.user_id())
            .await
            .map_err(map_meal_error)?;
        let meals = index_meals(meals);

        Ok(payments
            .into_iter()
            .map(|payment| PaymentWithMeal {
                meal: meals.get(&payment.meal_id).cloned(),
                payment,
            })
            .collect())
    }

    async fn list_all(&self, caller: &Identity) -> Result<Vec<AdminPaymentView>, Error> {
        caller.require_admin()?;
        let payments = self.payments.list_all().await.map_err(map_payment_error)?;
        let meals = index_meals(self.meals.list_all().await.map_err(map_meal_error)?);
        let payers = distinct_users(payments.iter().map(|payment| payment.user_id));
        let contacts = self
            .users
            .find_contacts(&payers)
            .await
            .map_err(map_user_error)?;

        Ok(payments
            .into_iter()
            .map(|payment| AdminPaymentView {
                meal: meals.get(&payment.meal_id).cloned(),
                user: contacts.get(&payment.user_id).cloned(),
                payment,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
