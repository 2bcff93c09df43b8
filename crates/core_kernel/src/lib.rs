//! Core Kernel - Foundational types shared by the claim intake crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money and rate types with precise decimal arithmetic
//! - The port vocabulary (`PortError`, `DomainPort`, `AdapterConfig`) that
//!   every external collaborator speaks

pub mod money;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError, Rate, round_money, sum_in, MONEY_DECIMAL_PLACES};
pub use ports::{PortError, DomainPort, AdapterConfig};
pub use error::CoreError;
