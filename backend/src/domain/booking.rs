//! Meal bookings: pricing, date-range derivation and validation.
//!
//! A booking covers `totalDays` consecutive days starting at `startDate`
//! (inclusive), so a one-day booking has `startDate == endDate`. The total is
//! `70 × mealsPerDay × numberOfMembers × totalDays` and is frozen at creation.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserContact, UserId};

/// Price of a single meal in currency units.
pub const UNIT_PRICE: u64 = 70;

/// Identifier of a meal booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(Uuid);

impl MealId {
    /// Parse an identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

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

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of meals served per day; the kitchen offers at most two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealsPerDay {
    /// One meal a day.
    One,
    /// Two meals a day.
    Two,
}

impl MealsPerDay {
    /// Numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<i64> for MealsPerDay {
    type Error = BookingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(BookingValidationError::InvalidMealsPerDay { value }),
        }
    }
}

/// Settlement state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Paid, either by settlement or admin override.
    Completed,
}

impl PaymentStatus {
    /// Lowercase storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parse the stored representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Reasons a booking request is rejected before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    /// `mealsPerDay` outside `{1, 2}`.
    #[error("mealsPerDay must be 1 or 2 (maximum 2 meals per day allowed), got {value}")]
    InvalidMealsPerDay { value: i64 },
    /// `numberOfMembers` below one or beyond the supported range.
    #[error("numberOfMembers must be a positive whole number, got {value}")]
    InvalidMemberCount { value: i64 },
    /// `totalDays` below one or beyond the supported range.
    #[error("totalDays must be a positive whole number, got {value}")]
    InvalidTotalDays { value: i64 },
    /// `startDate` precedes the current date.
    #[error("startDate {start_date} must not be before {today}")]
    StartDateInPast {
        start_date: NaiveDate,
        today: NaiveDate,
    },
    /// The computed total does not fit the ledger's amount range.
    #[error("booking total exceeds the supported amount range")]
    AmountOverflow,
    /// The computed end date falls outside the calendar range.
    #[error("booking end date exceeds the supported calendar range")]
    DateOverflow,
}

impl BookingValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidMealsPerDay { .. } => "mealsPerDay",
            Self::InvalidMemberCount { .. } | Self::AmountOverflow => "numberOfMembers",
            Self::InvalidTotalDays { .. } | Self::DateOverflow => "totalDays",
            Self::StartDateInPast { .. } => "startDate",
        }
    }

    /// Machine-readable detail code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidMealsPerDay { .. } => "invalid_meals_per_day",
            Self::InvalidMemberCount { .. } => "invalid_number_of_members",
            Self::InvalidTotalDays { .. } => "invalid_total_days",
            Self::StartDateInPast { .. } => "start_date_in_past",
            Self::AmountOverflow => "amount_overflow",
            Self::DateOverflow => "date_overflow",
        }
    }
}

/// Raw booking parameters submitted by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    /// Requested meals per day.
    pub meals_per_day: i64,
    /// Number of people eating.
    pub number_of_members: i64,
    /// Number of consecutive days.
    pub total_days: i64,
    /// First day of the booking.
    pub start_date: NaiveDate,
}

/// A validated booking with its derived end date and total.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use meal_ledger::domain::{BookingPlan, BookingRequest};
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 1).expect("date");
/// let plan = BookingPlan::new(
///     &BookingRequest { meals_per_day: 2, number_of_members: 3, total_days: 5, start_date: today },
///     today,
/// )
/// .expect("valid booking");
/// assert_eq!(plan.total_amount(), 2100);
/// assert_eq!(plan.end_date(), NaiveDate::from_ymd_opt(2026, 3, 5).expect("date"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPlan {
    meals_per_day: MealsPerDay,
    number_of_members: u32,
    total_days: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_amount: u64,
}

impl BookingPlan {
    /// Validate `request` against `today` and derive the end date and total.
    ///
    /// Only the calendar date matters; the time of day is ignored.
    pub fn new(request: &BookingRequest, today: NaiveDate) -> Result<Self, BookingValidationError> {
        let meals_per_day = MealsPerDay::try_from(request.meals_per_day)?;
        let number_of_members = positive(request.number_of_members).ok_or(
            BookingValidationError::InvalidMemberCount {
                value: request.number_of_members,
            },
        )?;
        let total_days = positive(request.total_days).ok_or(
            BookingValidationError::InvalidTotalDays {
                value: request.total_days,
            },
        )?;
        if request.start_date < today {
            return Err(BookingValidationError::StartDateInPast {
                start_date: request.start_date,
                today,
            });
        }

        let total_amount = total_amount(meals_per_day, number_of_members, total_days)
            .filter(|amount| i64::try_from(*amount).is_ok())
            .ok_or(BookingValidationError::AmountOverflow)?;
        let end_date =
            end_date(request.start_date, total_days).ok_or(BookingValidationError::DateOverflow)?;

        Ok(Self {
            meals_per_day,
            number_of_members,
            total_days,
            start_date: request.start_date,
            end_date,
            total_amount,
        })
    }

    /// Meals per day.
    #[must_use]
    pub const fn meals_per_day(&self) -> MealsPerDay {
        self.meals_per_day
    }

    /// Number of people eating.
    #[must_use]
    pub const fn number_of_members(&self) -> u32 {
        self.number_of_members
    }

    /// Number of consecutive days.
    #[must_use]
    pub const fn total_days(&self) -> u32 {
        self.total_days
    }

    /// First day, inclusive.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day, inclusive.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Price of the whole booking.
    #[must_use]
    pub const fn total_amount(&self) -> u64 {
        self.total_amount
    }
}

fn positive(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|count| *count >= 1)
}

/// `70 × mealsPerDay × numberOfMembers × totalDays`, or `None` on overflow.
#[must_use]
pub fn total_amount(meals_per_day: MealsPerDay, number_of_members: u32, total_days: u32) -> Option<u64> {
    UNIT_PRICE
        .checked_mul(u64::from(meals_per_day.get()))?
        .checked_mul(u64::from(number_of_members))?
        .checked_mul(u64::from(total_days))
}

/// Last day of a booking covering `total_days` days from `start_date`.
#[must_use]
pub fn end_date(start_date: NaiveDate, total_days: u32) -> Option<NaiveDate> {
    start_date.checked_add_days(Days::new(u64::from(total_days.saturating_sub(1))))
}

/// A persisted meal booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Booking identifier.
    pub id: MealId,
    /// Owner of the booking.
    pub user_id: UserId,
    /// Meals per day, 1 or 2.
    pub meals_per_day: u32,
    /// Number of people eating.
    pub number_of_members: u32,
    /// Number of consecutive days.
    pub total_days: u32,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Price frozen at creation.
    pub total_amount: u64,
    /// Settlement state.
    pub payment_status: PaymentStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Meal {
    /// Create a pending booking for `owner` from a validated plan.
    #[must_use]
    pub fn book(plan: &BookingPlan, owner: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: MealId::random(),
            user_id: owner,
            meals_per_day: plan.meals_per_day().get(),
            number_of_members: plan.number_of_members(),
            total_days: plan.total_days(),
            start_date: plan.start_date(),
            end_date: plan.end_date(),
            total_amount: plan.total_amount(),
            payment_status: PaymentStatus::Pending,
            created_at,
        }
    }

    /// Number of individual meals the booking covers.
    #[must_use]
    pub fn meal_count(&self) -> u64 {
        u64::from(self.meals_per_day)
            .saturating_mul(u64::from(self.number_of_members))
            .saturating_mul(u64::from(self.total_days))
    }

    /// Whether `user_id` owns the booking.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    /// Whether the booking has been paid.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.payment_status, PaymentStatus::Completed)
    }
}

/// Booking joined with the owner's contact details for admin views.
///
/// `user` is `None` when the owner is no longer in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealWithOwner {
    /// The booking.
    #[serde(flatten)]
    pub meal: Meal,
    /// Owner contact details.
    pub user: Option<UserContact>,
}

/// Result of creating a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    /// Identifier of the new booking.
    pub meal_id: MealId,
    /// Amount to pay.
    pub total_amount: u64,
    /// The stored booking.
    pub meal: Meal,
}

impl From<Meal> for BookingReceipt {
    fn from(meal: Meal) -> Self {
        Self {
            meal_id: meal.id,
            total_amount: meal.total_amount,
            meal,
        }
    }
}
