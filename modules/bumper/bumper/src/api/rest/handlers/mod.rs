//! REST handlers. Each one extracts its inputs, calls a domain service and
//! converts the result into a DTO; errors travel as `Problem` via `?`.

pub mod health;
pub mod incidents;
pub mod photos;
pub mod users;
