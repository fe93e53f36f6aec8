//! API endpoint handlers.

pub mod comando;
pub mod health;
