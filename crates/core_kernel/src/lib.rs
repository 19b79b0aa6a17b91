//! Core Kernel - Foundational types and utilities for the policy exporter
//!
//! This crate provides the fundamental building blocks used across the workspace:
//! - Integer-backed identifiers for policies and notes
//! - Timestamp parsing for the HTTP boundary
//! - Port infrastructure shared by every store adapter

pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use temporal::{parse_timestamp, utc_midnight, TemporalError};
pub use identifiers::{PolicyId, NoteId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
