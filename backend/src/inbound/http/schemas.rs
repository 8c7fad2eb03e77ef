//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the JSON shape of their corresponding domain
//! types (camelCase, flattened joins) but live in the inbound adapter layer
//! where framework concerns belong.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No bearer token was supplied.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Token rejected or caller lacks the required role or ownership.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The booking is already settled.
    #[schema(rename = "conflict")]
    Conflict,
    /// The store is temporarily unreachable; retry later.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Human-readable message returned to clients.
    #[schema(example = "Meal booking not found")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::PaymentStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PaymentStatus)]
pub enum PaymentStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "completed")]
    Completed,
}

/// OpenAPI schema for [`crate::domain::PaymentMethod`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PaymentMethod)]
pub enum PaymentMethodSchema {
    #[schema(rename = "online")]
    Online,
    #[schema(rename = "cash")]
    Cash,
}

/// OpenAPI schema for [`crate::domain::PaymentRecordStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PaymentRecordStatus)]
pub enum PaymentRecordStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "completed")]
    Completed,
    #[schema(rename = "failed")]
    Failed,
}

/// OpenAPI schema for [`crate::domain::Meal`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Meal, rename_all = "camelCase")]
pub struct MealSchema {
    #[schema(value_type = uuid::Uuid)]
    id: String,
    #[schema(value_type = uuid::Uuid)]
    user_id: String,
    #[schema(minimum = 1, maximum = 2, example = 2)]
    meals_per_day: u32,
    #[schema(minimum = 1, example = 3)]
    number_of_members: u32,
    #[schema(minimum = 1, example = 5)]
    total_days: u32,
    #[schema(format = Date, example = "2026-06-15")]
    start_date: String,
    /// `startDate + totalDays - 1`.
    #[schema(format = Date, example = "2026-06-19")]
    end_date: String,
    /// `70 × mealsPerDay × numberOfMembers × totalDays`.
    #[schema(example = 2100)]
    total_amount: u64,
    payment_status: PaymentStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::UserContact`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserContact)]
pub struct UserContactSchema {
    name: String,
    email: String,
    phone: String,
}

/// OpenAPI schema for [`crate::domain::MealWithOwner`].
///
/// Booking fields are flattened alongside the owner's contact details.
#[derive(ToSchema)]
#[schema(as = crate::domain::MealWithOwner, rename_all = "camelCase")]
pub struct MealWithOwnerSchema {
    #[schema(value_type = uuid::Uuid)]
    id: String,
    #[schema(value_type = uuid::Uuid)]
    user_id: String,
    meals_per_day: u32,
    number_of_members: u32,
    total_days: u32,
    #[schema(format = Date)]
    start_date: String,
    #[schema(format = Date)]
    end_date: String,
    total_amount: u64,
    payment_status: PaymentStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
    /// `null` when the owner is no longer registered.
    user: Option<UserContactSchema>,
}

/// OpenAPI schema for [`crate::domain::Payment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Payment, rename_all = "camelCase")]
pub struct PaymentSchema {
    #[schema(value_type = uuid::Uuid)]
    id: String,
    #[schema(value_type = uuid::Uuid)]
    meal_id: String,
    #[schema(value_type = uuid::Uuid)]
    user_id: String,
    /// Copied from the booking total at settlement.
    amount: u64,
    payment_method: PaymentMethodSchema,
    transaction_id: Option<String>,
    status: PaymentRecordStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::PaymentWithMeal`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PaymentWithMeal, rename_all = "camelCase")]
pub struct PaymentWithMealSchema {
    #[schema(value_type = uuid::Uuid)]
    id: String,
    #[schema(value_type = uuid::Uuid)]
    meal_id: String,
    #[schema(value_type = uuid::Uuid)]
    user_id: String,
    amount: u64,
    payment_method: PaymentMethodSchema,
    transaction_id: Option<String>,
    status: PaymentRecordStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
    meal: Option<MealSchema>,
}

/// OpenAPI schema for [`crate::domain::AdminPaymentView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AdminPaymentView, rename_all = "camelCase")]
pub struct AdminPaymentViewSchema {
    #[schema(value_type = uuid::Uuid)]
    id: String,
    #[schema(value_type = uuid::Uuid)]
    meal_id: String,
    #[schema(value_type = uuid::Uuid)]
    user_id: String,
    amount: u64,
    payment_method: PaymentMethodSchema,
    transaction_id: Option<String>,
    status: PaymentRecordStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
    meal: Option<MealSchema>,
    user: Option<UserContactSchema>,
}

/// OpenAPI schema for [`crate::domain::UserProfile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserProfile, rename_all = "camelCase")]
pub struct UserProfileSchema {
    #[schema(value_type = uuid::Uuid)]
    id: String,
    #[schema(example = "Asha Rao")]
    name: String,
    #[schema(example = "asha@example.com")]
    email: String,
    #[schema(example = "member")]
    role: String,
    phone: String,
    /// Reference path of the uploaded identity proof.
    identity_proof: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::PhaseCounts`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PhaseCounts)]
pub struct PhaseCountsSchema {
    pending: u64,
    active: u64,
    upcoming: u64,
    past: u64,
}

/// OpenAPI schema for [`crate::domain::DashboardStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DashboardStats, rename_all = "camelCase")]
pub struct DashboardStatsSchema {
    total_meals: u64,
    total_revenue: u64,
    pending_revenue: u64,
    distinct_users: u64,
    phases: PhaseCountsSchema,
}
