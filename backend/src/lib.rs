//! Todo backend library: domain model, adapters and HTTP surface.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! use the same modules with the in-memory adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
