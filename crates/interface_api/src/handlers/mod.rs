//! Request handlers

pub mod claims;
pub mod policies;
pub mod health;
