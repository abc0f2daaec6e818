//! Domain layer: business rules, repository ports and services.
//!
//! The domain layer:
//! - **MAY** import: `bumper_sdk` (contract types)
//! - **MUST NOT** import: `api::*` or `infra::*` (one-way dependency)

pub mod error;
pub mod geo;
pub mod repos;
pub mod service;
pub mod session;
pub mod validation;
