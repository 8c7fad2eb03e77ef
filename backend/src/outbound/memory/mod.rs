//! In-process ledger used when no database is configured and in tests.
//!
//! All three repositories share one mutex so settlement is atomic exactly as
//! it is inside a database transaction.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MealRepository, MealRepositoryError, PaymentRepository, PaymentRepositoryError, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{
    Meal, MealId, Payment, PaymentRecordStatus, PaymentStatus, ProfileUpdate, UserContact, UserId,
    UserProfile,
};

#[derive(Debug, Default)]
struct LedgerState {
    users: Vec<UserProfile>,
    meals: Vec<Meal>,
    payments: Vec<Payment>,
}

impl LedgerState {
    fn has_completed_payment(&self, meal_id: &MealId) -> bool {
        self.payments.iter().any(|payment| {
            payment.meal_id == *meal_id && payment.status == PaymentRecordStatus::Completed
        })
    }
}

/// Mutex-guarded store implementing every driven persistence port.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

const POISONED: &str = "in-memory ledger lock poisoned";

/// Newest first by `created_at`; later inserts win ties.
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut listed: Vec<T> = items.iter().rev().cloned().collect();
    listed.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    listed
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user as the identity provider would.
    ///
    /// Re-registering an existing id replaces the stored profile.
    pub fn register_user(&self, profile: UserProfile) -> Result<(), UserDirectoryError> {
        let mut state = self.lock_users()?;
        state.users.retain(|existing| existing.id != profile.id);
        state.users.push(profile);
        Ok(())
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, LedgerState>, E> {
        self.state.lock().map_err(|_| poisoned(POISONED))
    }

    fn lock_meals(&self) -> Result<MutexGuard<'_, LedgerState>, MealRepositoryError> {
        self.lock(MealRepositoryError::query)
    }

    fn lock_payments(&self) -> Result<MutexGuard<'_, LedgerState>, PaymentRepositoryError> {
        self.lock(PaymentRepositoryError::query)
    }

    fn lock_users(&self) -> Result<MutexGuard<'_, LedgerState>, UserDirectoryError> {
        self.lock(UserDirectoryError::query)
    }
}

#[async_trait]
impl MealRepository for InMemoryLedger {
    async fn insert(&self, meal: &Meal) -> Result<(), MealRepositoryError> {
        let mut state = self.lock_meals()?;
        if state.meals.iter().any(|existing| existing.id == meal.id) {
            return Err(MealRepositoryError::query(format!(
                "duplicate meal id {}",
                meal.id
            )));
        }
        state.meals.push(meal.clone());
        Ok(())
    }

    async fn find_by_id(&self, meal_id: &MealId) -> Result<Option<Meal>, MealRepositoryError> {
        let state = self.lock_meals()?;
        Ok(state.meals.iter().find(|meal| meal.id == *meal_id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Meal>, MealRepositoryError> {
        let state = self.lock_meals()?;
        let owned: Vec<Meal> = state
            .meals
            .iter()
            .filter(|meal| meal.user_id == *user_id)
            .cloned()
            .collect();
        Ok(newest_first(&owned, |meal| meal.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Meal>, MealRepositoryError> {
        let state = self.lock_meals()?;
        Ok(newest_first(&state.meals, |meal| meal.created_at))
    }

    async fn update_status(
        &self,
        meal_id: &MealId,
        status: PaymentStatus,
    ) -> Result<Option<Meal>, MealRepositoryError> {
        let mut state = self.lock_meals()?;
        let reopening_paid =
            status == PaymentStatus::Pending && state.has_completed_payment(meal_id);
        let Some(meal) = state.meals.iter_mut().find(|meal| meal.id == *meal_id) else {
            return Ok(None);
        };
        if reopening_paid {
            return Err(MealRepositoryError::settled_by_payment(*meal_id));
        }
        meal.payment_status = status;
        Ok(Some(meal.clone()))
    }
}

#[async_trait]
impl PaymentRepository for InMemoryLedger {
    async fn settle(&self, payment: &Payment) -> Result<Meal, PaymentRepositoryError> {
        let mut state = self.lock_payments()?;
        let paid = state.has_completed_payment(&payment.meal_id);
        let meal = state
            .meals
            .iter_mut()
            .find(|meal| meal.id == payment.meal_id)
            .ok_or(PaymentRepositoryError::MealNotFound {
                meal_id: payment.meal_id,
            })?;
        if meal.user_id != payment.user_id {
            return Err(PaymentRepositoryError::not_owner(meal.id));
        }
        if meal.is_settled() || paid {
            return Err(PaymentRepositoryError::already_settled(meal.id));
        }

        meal.payment_status = PaymentStatus::Completed;
        let settled = meal.clone();
        state.payments.push(payment.clone());
        Ok(settled)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let state = self.lock_payments()?;
        let made: Vec<Payment> = state
            .payments
            .iter()
            .filter(|payment| payment.user_id == *user_id)
            .cloned()
            .collect();
        Ok(newest_first(&made, |payment| payment.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let state = self.lock_payments()?;
        Ok(newest_first(&state.payments, |payment| payment.created_at))
    }
}

#[async_trait]
impl UserDirectory for InMemoryLedger {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let state = self.lock_users()?;
        Ok(state.users.iter().find(|user| user.id == *user_id).cloned())
    }

    async fn find_contacts(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, UserContact>, UserDirectoryError> {
        let state = self.lock_users()?;
        Ok(state
            .users
            .iter()
            .filter(|user| user_ids.contains(&user.id))
            .map(|user| (user.id, user.contact()))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<UserProfile>, UserDirectoryError> {
        let state = self.lock_users()?;
        Ok(newest_first(&state.users, |user| user.created_at))
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        let mut state = self.lock_users()?;
        Ok(state
            .users
            .iter_mut()
            .find(|user| user.id == *user_id)
            .map(|user| {
                user.apply(update);
                user.clone()
            }))
    }
}
