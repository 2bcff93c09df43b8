//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claim intake test suite.
//!
//! # Modules
//!
//! - `fixtures`: Extraction outputs, ledgers, policy pages and interpreter replies
//! - `builders`: Builder patterns for claim items and coverage terms
//! - `fakes`: Scripted and failing implementations of the retrieval and interpretation ports
//! - `assertions`: Custom assertion helpers for calculations and results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod fakes;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use fakes::*;
pub use assertions::*;
pub use generators::*;
