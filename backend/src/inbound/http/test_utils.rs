//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header;

use crate::domain::ports::{
    FixtureMealRepository, FixturePaymentRepository, FixtureUserDirectory, IdentityVerifier,
    MockIdentityVerifier,
};
use crate::domain::Identity;
use crate::test_support::{FixedClock, fixture_now};

use super::state::{HttpState, HttpStatePorts};

/// Build state whose services run over empty fixture stores.
///
/// Only the verifier is supplied so extractor tests can control which tokens
/// are accepted.
pub fn fixture_state(verifier: Arc<dyn IdentityVerifier>) -> HttpState {
    HttpState::new(HttpStatePorts::over_stores(
        Arc::new(FixtureMealRepository),
        Arc::new(FixturePaymentRepository),
        Arc::new(FixtureUserDirectory),
        Arc::new(FixedClock::new(fixture_now())),
        verifier,
    ))
}

/// Verifier accepting any token as `identity`.
pub fn verifier_for(identity: Identity) -> Arc<dyn IdentityVerifier> {
    let mut verifier = MockIdentityVerifier::new();
    verifier.expect_verify().returning(move |_| Ok(identity));
    Arc::new(verifier)
}

/// `Authorization` header carrying an opaque test token.
pub fn bearer() -> (header::HeaderName, &'static str) {
    (header::AUTHORIZATION, "Bearer test-token")
}
