//! PostgreSQL persistence adapters.
//!
//! Repositories share a [`DbPool`] built once at start-up. Row structs in
//! `models` never leave this module.

mod diesel_basic_error_mapping;
mod diesel_meal_repository;
mod diesel_payment_repository;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_meal_repository::DieselMealRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
