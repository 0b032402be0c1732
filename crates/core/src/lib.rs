//! Core business logic for florai-rs.
//!
//! Services sit between the HTTP layer and the repositories: they validate
//! input, enforce ownership and roles, and talk to the prediction services.

pub mod services;

pub use services::*;
