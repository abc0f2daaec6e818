//! Bumper SDK
//!
//! Public contract of the `bumper` module:
//! - `BumperClientV1` trait for in-process consumers
//! - Model types for users, incidents and incident photos
//! - Error type (`BumperError`)
//!
//! ## Usage
//!
//! ```ignore
//! use bumper_sdk::BumperClientV1;
//!
//! let client: Arc<dyn BumperClientV1> = module.client();
//! let nearby = client.nearby_incidents(19.43, -99.13, 5.0).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod errors;
pub mod models;

pub use client::BumperClientV1;
pub use errors::BumperError;
pub use models::{
    Incident, IncidentStatus, LoginOutcome, NearbyIncident, NearbyQuery, NewIncident, NewPhoto,
    NewUser, Photo, Session, SessionStatus, UnknownStatus, User, UserPatch,
};
