//! Test Utilities Crate
//!
//! Shared test infrastructure for the policy exporter test suites.
//!
//! # Modules
//!
//! - `fixtures`: Dates, numbers and seed facts
//! - `builders`: Builders for create inputs and stored rows
//! - `assertions`: Assertion helpers for policy DTOs
//! - `generators`: Property-based test data generators
//! - `doubles`: Store doubles that fail or cancel on demand

pub mod assertions;
pub mod builders;
pub mod doubles;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use doubles::*;
pub use fixtures::*;
pub use generators::*;
