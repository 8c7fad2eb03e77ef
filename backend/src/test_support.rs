//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and the `test-support` feature only.

use std::sync::Mutex;

use chrono::{DateTime, Days, Local, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use mockable::Clock;

use crate::domain::{Role, UserId, UserProfile};
use crate::outbound::identity::TokenClaims;

/// Secret used to sign tokens in tests; long enough for release-mode checks.
pub const TEST_JWT_SECRET: &[u8] = b"meal-ledger-test-secret-0123456789abcdef";

/// Fixed instant used as "now" across tests: 2026-06-15T09:00:00Z.
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixture timestamp is valid"),
    }
}

/// Clock frozen at a chosen instant that tests may move forward.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: u64) {
        let mut now = self.lock_clock();
        *now = match now.checked_add_days(Days::new(days)) {
            Some(later) => later,
            None => panic!("clock overflow advancing {days} days"),
        };
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Profile with a fixed phone number, registered at [`fixture_now`].
pub fn sample_profile(id: UserId, name: &str, email: &str, role: Role) -> UserProfile {
    UserProfile {
        id,
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        phone: "555-0100".to_owned(),
        identity_proof: None,
        created_at: fixture_now(),
    }
}

/// Sign an HS256 token the way the identity provider does.
///
/// `ttl_seconds` is relative to the wall clock because token expiry is
/// checked against system time; negative values mint expired tokens.
pub fn mint_token(secret: &[u8], user_id: &UserId, role: &str, ttl_seconds: i64) -> String {
    let exp = Utc::now().timestamp().saturating_add(ttl_seconds);
    let claims = TokenClaims {
        user_id: user_id.to_string(),
        email: None,
        role: role.to_owned(),
        exp: u64::try_from(exp).unwrap_or_default(),
    };
    match encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)) {
        Ok(token) => token,
        Err(error) => panic!("failed to sign test token: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::IdentityVerifier;
    use crate::outbound::identity::JwtIdentityVerifier;

    #[test]
    fn fixed_clock_advances_by_days() {
        let clock = FixedClock::new(fixture_now());
        clock.advance_days(3);
        assert_eq!(
            clock.utc().date_naive(),
            fixture_now().date_naive() + chrono::Duration::days(3)
        );
    }

    #[test]
    fn minted_tokens_verify() {
        let user = UserId::random();
        let token = mint_token(TEST_JWT_SECRET, &user, "admin", 60);
        let identity = JwtIdentityVerifier::new(TEST_JWT_SECRET)
            .verify(&token)
            .expect("token verifies");
        assert_eq!(identity.user_id(), &user);
        assert_eq!(identity.role(), Role::Admin);
    }
}
