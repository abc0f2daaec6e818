//! REST surface: DTOs, handlers, routes, error mapping and the OpenAPI document.
//!
//! The API layer depends on `domain`, never the other way around. It is the
//! only place where domain errors become HTTP status codes.

pub mod auth;
pub mod dto;
pub mod error;
pub(crate) mod handlers;
pub mod openapi;
pub mod problem;
pub mod routes;

pub use problem::{ApiResult, Problem};
