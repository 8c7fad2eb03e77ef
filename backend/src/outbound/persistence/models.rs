//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types are
//! fallible because stored values are range-checked on the way out.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Meal, MealId, Payment, PaymentId, PaymentMethod, PaymentRecordStatus, PaymentStatus, Role,
    UserId, UserProfile,
};

use super::schema::{meals, payments, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: String,
    pub identity_proof: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_profile(self) -> Result<UserProfile, String> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| format!("user {} has unknown role '{}'", self.id, self.role))?;
        Ok(UserProfile {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            role,
            phone: self.phone,
            identity_proof: self.identity_proof,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for seeding user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub phone: &'a str,
    pub identity_proof: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset for profile edits; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
}

/// Row struct for reading from the meals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meals_per_day: i16,
    pub number_of_members: i64,
    pub total_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: i64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl MealRow {
    pub(crate) fn into_meal(self) -> Result<Meal, String> {
        let id = self.id;
        let out_of_range = |column: &str| format!("meal {id} has out-of-range {column}");
        Ok(Meal {
            id: MealId::from_uuid(id),
            user_id: UserId::from_uuid(self.user_id),
            meals_per_day: u32::try_from(self.meals_per_day)
                .map_err(|_| out_of_range("meals_per_day"))?,
            number_of_members: u32::try_from(self.number_of_members)
                .map_err(|_| out_of_range("number_of_members"))?,
            total_days: u32::try_from(self.total_days).map_err(|_| out_of_range("total_days"))?,
            start_date: self.start_date,
            end_date: self.end_date,
            total_amount: u64::try_from(self.total_amount)
                .map_err(|_| out_of_range("total_amount"))?,
            payment_status: PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
                format!("meal {id} has unknown payment status '{}'", self.payment_status)
            })?,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating meal records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meals)]
pub(crate) struct NewMealRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meals_per_day: i16,
    pub number_of_members: i64,
    pub total_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: i64,
    pub payment_status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewMealRow<'a> {
    pub(crate) fn from_meal(meal: &'a Meal) -> Result<Self, String> {
        Ok(Self {
            id: *meal.id.as_uuid(),
            user_id: *meal.user_id.as_uuid(),
            meals_per_day: i16::try_from(meal.meals_per_day)
                .map_err(|_| format!("meals_per_day {} out of range", meal.meals_per_day))?,
            number_of_members: i64::from(meal.number_of_members),
            total_days: i64::from(meal.total_days),
            start_date: meal.start_date,
            end_date: meal.end_date,
            total_amount: i64::try_from(meal.total_amount)
                .map_err(|_| format!("total_amount {} out of range", meal.total_amount))?,
            payment_status: meal.payment_status.as_str(),
            created_at: meal.created_at,
        })
    }
}

/// Row struct for reading from the payments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentRow {
    pub(crate) fn into_payment(self) -> Result<Payment, String> {
        let id = self.id;
        Ok(Payment {
            id: PaymentId::from_uuid(id),
            meal_id: MealId::from_uuid(self.meal_id),
            user_id: UserId::from_uuid(self.user_id),
            amount: u64::try_from(self.amount)
                .map_err(|_| format!("payment {id} has negative amount"))?,
            payment_method: PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
                format!("payment {id} has unknown method '{}'", self.payment_method)
            })?,
            transaction_id: self.transaction_id,
            status: PaymentRecordStatus::parse(&self.status)
                .ok_or_else(|| format!("payment {id} has unknown status '{}'", self.status))?,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating payment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub payment_method: &'a str,
    pub transaction_id: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewPaymentRow<'a> {
    pub(crate) fn from_payment(payment: &'a Payment) -> Result<Self, String> {
        Ok(Self {
            id: *payment.id.as_uuid(),
            meal_id: *payment.meal_id.as_uuid(),
            user_id: *payment.user_id.as_uuid(),
            amount: i64::try_from(payment.amount)
                .map_err(|_| format!("amount {} out of range", payment.amount))?,
            payment_method: payment.payment_method.as_str(),
            transaction_id: payment.transaction_id.as_deref(),
            status: payment.status.as_str(),
            created_at: payment.created_at,
        })
    }
}
