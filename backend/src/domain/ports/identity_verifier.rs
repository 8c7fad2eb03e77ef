//! Port for verifying bearer tokens issued by the identity provider.

use crate::domain::Identity;

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer token is rejected.
    pub enum IdentityVerificationError {
        /// Signature, expiry or structure check failed.
        InvalidToken { message: String } =>
            "invalid token: {message}",
        /// The token verified but its claims are unusable.
        InvalidClaims { message: String } =>
            "invalid token claims: {message}",
    }
}

/// Verifies a bearer token and yields the asserted identity.
///
/// Verification is pure CPU work over a shared secret, so the port is
/// synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` and extract `(subject, role)`.
    fn verify(&self, token: &str) -> Result<Identity, IdentityVerificationError>;
}
