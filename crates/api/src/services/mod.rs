//! Application services.
//!
//! Services orchestrate repositories and own the business rules that span
//! more than one table: authentication/registration and order placement.

pub mod auth;
pub mod orders;
