//! Domain-level building blocks for the admin gateway.
//!
//! Keeps the pure pieces (service-name resolution, configuration loading,
//! telemetry wiring) out of the HTTP binary so they stay deterministic and
//! unit-testable without a running server.

pub mod config;
pub mod locator;
pub mod services;

pub use locator::{resolve_base_url, ServiceKind};
