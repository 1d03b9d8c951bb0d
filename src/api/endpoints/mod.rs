//! API endpoint handlers.

pub mod auth;
pub mod health;
pub mod patients;
