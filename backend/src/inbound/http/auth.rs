//! Bearer token extraction for HTTP handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument and receive a verified
//! [`Identity`]; token parsing and verification never leak into handler
//! bodies.

use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, Identity};

use super::state::HttpState;

/// Caller identity established from the `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(Identity);

impl AuthenticatedUser {
    /// Wrap an already verified identity.
    pub fn new(identity: Identity) -> Self {
        Self(identity)
    }

    /// The verified identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl Deref for AuthenticatedUser {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// Returns `None` when the header is absent, not ASCII, uses another scheme
/// or carries an empty token.
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let token = bearer_token(req)
        .ok_or_else(|| Error::unauthorized("Access denied. No token provided."))?;

    state
        .verifier
        .verify(token)
        .map(AuthenticatedUser::new)
        .map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::forbidden("Invalid or expired token")
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
