//! Repository implementations
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. They return [`DatabaseError`](crate::DatabaseError); translation to
//! port errors happens in the adapters.

pub mod policy;

pub use policy::{NewPolicyRow, NoteRow, PolicyRepository, PolicyRow};
