//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod auth_config;
pub mod error;
pub mod health;
pub mod meals;
pub mod payments;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Every authenticated endpoint, mounted under `/api`.
///
/// Static segments are registered before parameterised ones so
/// `/meals/admin/stats` is never captured as a booking id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use meal_ledger::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(error::json_config())
        .app_data(error::path_config())
        .app_data(error::query_config())
        .service(meals::create_meal)
        .service(meals::list_meals)
        .service(meals::meal_summary)
        .service(meals::list_own_meals)
        .service(meals::meal_stats)
        .service(meals::list_all_meals)
        .service(meals::update_meal_status)
        .service(payments::payment_history)
        .service(payments::list_all_payments)
        .service(payments::settle_payment)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(users::list_users)
}
