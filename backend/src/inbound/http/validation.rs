//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path segments and query parameters arrive as strings so malformed values
//! produce field-level `400` errors instead of generic extractor failures.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{Error, MealId, PaymentMethod, PaymentStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidPaymentStatus,
    InvalidPaymentMethod,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidPaymentStatus => "invalid_payment_status",
            ErrorCode::InvalidPaymentMethod => "invalid_payment_method",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_meal_id(value: &str, field: FieldName) -> Result<MealId, Error> {
    MealId::new(value).map_err(|_| {
        invalid_value(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        invalid_value(
            field,
            format!("{} must be a YYYY-MM-DD date", field.as_str()),
            ErrorCode::InvalidDate,
            value,
        )
    })
}

pub(crate) fn parse_payment_status(value: &str, field: FieldName) -> Result<PaymentStatus, Error> {
    PaymentStatus::parse(value).ok_or_else(|| {
        invalid_value(
            field,
            format!("{} must be 'pending' or 'completed'", field.as_str()),
            ErrorCode::InvalidPaymentStatus,
            value,
        )
    })
}

pub(crate) fn parse_payment_method(value: &str, field: FieldName) -> Result<PaymentMethod, Error> {
    PaymentMethod::parse(value).ok_or_else(|| {
        invalid_value(
            field,
            format!("{} must be 'online' or 'cash'", field.as_str()),
            ErrorCode::InvalidPaymentMethod,
            value,
        )
    })
}

/// Parse an optional query parameter, treating blank values as absent.
pub(crate) fn parse_optional<T>(
    value: Option<&str>,
    field: FieldName,
    parse: impl FnOnce(&str, FieldName) -> Result<T, Error>,
) -> Result<Option<T>, Error> {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => parse(raw, field).map(Some),
        _ => Ok(None),
    }
}
