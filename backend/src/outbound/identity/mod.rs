//! Identity provider adapters.

mod jwt;

pub use jwt::{JwtIdentityVerifier, TokenClaims};
