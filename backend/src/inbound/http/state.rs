//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BookingCommand, BookingQuery, IdentityVerifier, MealRepository, PaymentCommand, PaymentQuery,
    PaymentRepository, UserDirectory, UserProfileCommand, UserProfileQuery,
};
use crate::domain::{BookingService, PaymentService, UserProfileService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub payments: Arc<dyn PaymentCommand>,
    pub payments_query: Arc<dyn PaymentQuery>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl HttpStatePorts {
    /// Wire the booking, payment and profile services over one set of
    /// stores.
    ///
    /// Every service shares `clock`, so "today" is consistent across
    /// booking phases and settlement timestamps.
    pub fn over_stores<M, P, U>(
        meals: Arc<M>,
        payments: Arc<P>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self
    where
        M: MealRepository + 'static,
        P: PaymentRepository + 'static,
        U: UserDirectory + 'static,
    {
        let bookings = Arc::new(BookingService::new(
            meals.clone(),
            users.clone(),
            clock.clone(),
        ));
        let settlement = Arc::new(PaymentService::new(meals, payments, users.clone(), clock));
        let profiles = Arc::new(UserProfileService::new(users));

        Self {
            bookings: bookings.clone(),
            bookings_query: bookings,
            payments: settlement.clone(),
            payments_query: settlement,
            profile: profiles.clone(),
            profile_command: profiles,
            verifier,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub payments: Arc<dyn PaymentCommand>,
    pub payments_query: Arc<dyn PaymentQuery>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl HttpState {
    /// Construct state from the bundled ports.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(HttpStatePorts {
    ///     bookings: booking_service.clone(),
    ///     bookings_query: booking_service,
    ///     payments: payment_service.clone(),
    ///     payments_query: payment_service,
    ///     profile: profile_service.clone(),
    ///     profile_command: profile_service,
    ///     verifier,
    /// });
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            bookings,
            bookings_query,
            payments,
            payments_query,
            profile,
            profile_command,
            verifier,
        } = ports;
        Self {
            bookings,
            bookings_query,
            payments,
            payments_query,
            profile,
            profile_command,
            verifier,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
