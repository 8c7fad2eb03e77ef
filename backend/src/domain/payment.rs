//! Payment records and settlement.
//!
//! Settling a booking records a completed payment whose amount is copied from
//! the booking's frozen total and flips the booking to `completed`. Both
//! writes land together or not at all.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Meal, MealId, UserContact, UserId};

/// Identifier of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the member paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid online; usually carries a transaction reference.
    Online,
    /// Paid in cash at the counter.
    Cash,
}

impl PaymentMethod {
    /// Lowercase storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Cash => "cash",
        }
    }

    /// Parse the stored representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "online" => Some(Self::Online),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

/// State of a payment record.
///
/// Settlement only ever writes `completed`; `pending` and `failed` are
/// accepted when reading stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    /// Payment started but not confirmed.
    Pending,
    /// Payment confirmed.
    Completed,
    /// Payment attempt failed.
    Failed,
}

impl PaymentRecordStatus {
    /// Lowercase storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse the stored representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A persisted payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment identifier.
    pub id: PaymentId,
    /// Booking being paid for.
    pub meal_id: MealId,
    /// Payer.
    pub user_id: UserId,
    /// Amount copied from the booking total.
    pub amount: u64,
    /// How the member paid.
    pub payment_method: PaymentMethod,
    /// Opaque external reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Record state.
    pub status: PaymentRecordStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Build the completed payment that settles `meal`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, Utc};
    /// use meal_ledger::domain::{
    ///     BookingPlan, BookingRequest, Meal, Payment, PaymentMethod, PaymentRecordStatus, UserId,
    /// };
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 3, 1).expect("date");
    /// let request = BookingRequest { meals_per_day: 2, number_of_members: 3, total_days: 5, start_date: today };
    /// let plan = BookingPlan::new(&request, today).expect("valid");
    /// let meal = Meal::book(&plan, UserId::random(), Utc::now());
    ///
    /// let payment = Payment::settling(&meal, PaymentMethod::Online, None, Utc::now());
    /// assert_eq!(payment.amount, 2100);
    /// assert_eq!(payment.status, PaymentRecordStatus::Completed);
    /// ```
    #[must_use]
    pub fn settling(
        meal: &Meal,
        payment_method: PaymentMethod,
        transaction_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PaymentId::random(),
            meal_id: meal.id,
            user_id: meal.user_id,
            amount: meal.total_amount,
            payment_method,
            transaction_id,
            status: PaymentRecordStatus::Completed,
            created_at,
        }
    }
}

/// Settlement instruction submitted by the booking owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRequest {
    /// Booking to settle.
    pub meal_id: MealId,
    /// How the member paid.
    pub payment_method: PaymentMethod,
    /// Opaque external reference.
    pub transaction_id: Option<String>,
}

/// Outcome of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// The completed payment.
    pub payment: Payment,
    /// The booking, now `completed`.
    pub meal: Meal,
}

/// Payment with its booking expanded, as shown in a member's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithMeal {
    /// The payment.
    #[serde(flatten)]
    pub payment: Payment,
    /// The booking, when it still exists.
    pub meal: Option<Meal>,
}

/// Payment with booking and payer contact expanded, as shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPaymentView {
    /// The payment.
    #[serde(flatten)]
    pub payment: Payment,
    /// The booking, when it still exists.
    pub meal: Option<Meal>,
    /// Payer contact details, when the payer is still in the directory.
    pub user: Option<UserContact>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("online", Some(PaymentMethod::Online))]
    #[case("cash", Some(PaymentMethod::Cash))]
    #[case("card", None)]
    fn parses_payment_methods(#[case] raw: &str, #[case] expected: Option<PaymentMethod>) {
        assert_eq!(PaymentMethod::parse(raw), expected);
    }

    #[rstest]
    #[case(PaymentRecordStatus::Pending)]
    #[case(PaymentRecordStatus::Completed)]
    #[case(PaymentRecordStatus::Failed)]
    fn record_status_round_trips_through_storage_form(#[case] status: PaymentRecordStatus) {
        assert_eq!(PaymentRecordStatus::parse(status.as_str()), Some(status));
    }

    #[rstest]
    fn history_entry_flattens_payment_fields() {
        let payment = Payment {
            id: PaymentId::random(),
            meal_id: MealId::random(),
            user_id: UserId::random(),
            amount: 490,
            payment_method: PaymentMethod::Cash,
            transaction_id: None,
            status: PaymentRecordStatus::Completed,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(PaymentWithMeal {
            payment,
            meal: None,
        })
        .expect("serialise history entry");

        assert_eq!(value["amount"], 490);
        assert_eq!(value["paymentMethod"], "cash");
        assert!(value["meal"].is_null());
        assert!(value.get("transactionId").is_none());
    }
}
