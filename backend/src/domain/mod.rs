//! Domain primitives, aggregates and services.
//!
//! Purpose: model the booking and payment lifecycle independently of HTTP
//! and storage. Entities are plain serde types; services implement the
//! driving ports over the driven ports declared in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - Meal, BookingPlan, BookingRequest: booking ledger entities.
//! - Payment, Settlement: payment ledger entities.
//! - Identity, Role, UserId, UserProfile: callers and their records.
//! - BookingService, PaymentService, UserProfileService: use-case services.

pub mod booking;
mod booking_service;
pub mod error;
pub mod identity;
pub mod payment;
mod payment_service;
pub mod ports;
pub mod reconciliation;
pub mod trace_id;
pub mod user;
mod user_profile_service;

pub use self::booking::{
    BookingPlan, BookingReceipt, BookingRequest, BookingValidationError, Meal, MealId,
    MealWithOwner, MealsPerDay, PaymentStatus, UNIT_PRICE,
};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode};
pub use self::identity::Identity;
pub use self::payment::{
    AdminPaymentView, Payment, PaymentId, PaymentMethod, PaymentRecordStatus, PaymentWithMeal,
    Settlement, SettlementRequest,
};
pub use self::payment_service::PaymentService;
pub use self::reconciliation::{BookingFilter, DashboardStats, PhaseCounts};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{ProfileUpdate, Role, UserContact, UserId, UserProfile, UserValidationError};
pub use self::user_profile_service::UserProfileService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use meal_ledger::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
