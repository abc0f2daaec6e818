//! Bumper Module
//!
//! Incident reporting backend: users register and log in, report road incidents
//! with a geolocation, attach photos and query incidents by owner, state or
//! proximity.
//!
//! ## Public API
//!
//! The public API is defined in the `bumper-sdk` crate and re-exported here:
//! - `BumperClientV1` - trait for in-process consumers
//! - `User`, `Incident`, `Photo` and their creation/patch models
//! - `BumperError` - error type
//!
//! Other modules obtain the client with [`Bumper::client`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use bumper_sdk::{
    BumperClientV1, BumperError, Incident, IncidentStatus, NewIncident, NewPhoto, NewUser, Photo,
    User, UserPatch,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::Bumper;

// === LOCAL CLIENT ===
// Local client adapter that implements BumperClientV1
pub mod local_client;

// === INTERNAL MODULES ===
// Exposed for integration tests and the server binary; external consumers
// should stick to the SDK types.
#[doc(hidden)]
pub mod api;
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
