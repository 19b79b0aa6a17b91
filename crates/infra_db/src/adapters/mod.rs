//! Domain Adapters
//!
//! Implementations of domain ports backed by PostgreSQL. Each adapter
//! translates between domain types and repository rows and folds
//! [`DatabaseError`](crate::DatabaseError) into `PortError`.

pub mod policy;

pub use policy::{PgPolicyTransaction, PostgresPolicyStore};
