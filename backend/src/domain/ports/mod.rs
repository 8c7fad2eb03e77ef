//! Domain ports.
//!
//! Driven ports (`*Repository`, [`UserDirectory`], [`IdentityVerifier`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod booking_query;
mod identity_verifier;
mod meal_repository;
mod payment_command;
mod payment_query;
mod payment_repository;
mod user_directory;
mod user_profile;

#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::BookingCommand;
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{IdentityVerificationError, IdentityVerifier};
#[cfg(test)]
pub use meal_repository::MockMealRepository;
pub use meal_repository::{FixtureMealRepository, MealRepository, MealRepositoryError};
#[cfg(test)]
pub use payment_command::MockPaymentCommand;
pub use payment_command::PaymentCommand;
#[cfg(test)]
pub use payment_query::MockPaymentQuery;
pub use payment_query::PaymentQuery;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{FixturePaymentRepository, PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
#[cfg(test)]
pub use user_profile::{MockUserProfileCommand, MockUserProfileQuery};
pub use user_profile::{UserProfileCommand, UserProfileQuery};
