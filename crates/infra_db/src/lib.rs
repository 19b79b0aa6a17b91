//! Infrastructure Database Layer
//!
//! PostgreSQL storage for policies and notes using SQLx.
//!
//! # Architecture
//!
//! - [`repositories`] hold the SQL and the row types
//! - [`adapters`] implement the domain's `PolicyStore` port over them
//! - [`schema`] creates the tables and loads the fixture rows
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, ensure_schema, DatabaseConfig, PostgresPolicyStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/policies")).await?;
//! ensure_schema(&pool).await?;
//! let store = PostgresPolicyStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;
pub mod schema;

pub use adapters::PostgresPolicyStore;
pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig};
pub use schema::{ensure_schema, seed_fixtures};
