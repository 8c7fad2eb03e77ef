//! Meal booking ledger backend library.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the booking and
//! payment rules plus the ports they depend on, [`inbound`] adapts HTTP
//! requests onto the driving ports, and [`outbound`] provides the Diesel and
//! in-memory stores plus the bearer token verifier.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
