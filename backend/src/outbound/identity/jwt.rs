//! HS256 bearer token verification.
//!
//! Tokens are issued by the identity provider with claims
//! `{userId, email, role, exp}`. Only the signature, expiry, subject and role
//! matter to the ledger.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityVerificationError, IdentityVerifier};
use crate::domain::{Identity, Role, UserId};

/// Claims carried by identity provider tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject identifier.
    pub user_id: String,
    /// Subject email, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `user`, `member` or `admin`.
    pub role: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: u64,
}

/// Verifies HS256 tokens against a shared secret.
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
    // Held so the secret bytes are wiped when the verifier is dropped.
    _secret: Zeroizing<Vec<u8>>,
}

impl JwtIdentityVerifier {
    /// Build a verifier for tokens signed with `secret`.
    ///
    /// # Examples
    /// ```
    /// use meal_ledger::domain::ports::IdentityVerifier;
    /// use meal_ledger::outbound::identity::JwtIdentityVerifier;
    ///
    /// let verifier = JwtIdentityVerifier::new(b"shared-secret");
    /// assert!(verifier.verify("not-a-token").is_err());
    /// ```
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
            _secret: Zeroizing::new(secret.to_vec()),
        }
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, IdentityVerificationError> {
        let data = decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|err| IdentityVerificationError::invalid_token(err.to_string()))?;
        let claims = data.claims;

        let user_id = UserId::new(&claims.user_id)
            .map_err(|err| IdentityVerificationError::invalid_claims(format!("userId: {err}")))?;
        let role = Role::parse(&claims.role).ok_or_else(|| {
            IdentityVerificationError::invalid_claims(format!("unknown role '{}'", claims.role))
        })?;
        Ok(Identity::new(user_id, role))
    }
}
