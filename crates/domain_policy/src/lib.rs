//! Policy Domain
//!
//! This crate holds everything the policy exporter knows about policies,
//! independent of how they are stored or served:
//! - **Entities**: `Policy`, `Note`, and the insert shape `NewPolicy`
//! - **DTOs**: `ReadPolicyDto`, `CreatePolicyDto`, `ExportDto`
//! - **Ports**: `PolicyStore` and `PolicyTransaction`, implemented here in
//!   memory and in `infra_db` on PostgreSQL
//! - **Service**: `PolicyService`, the create / read / export use cases with
//!   their transactional and cancellation semantics
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{InMemoryPolicyStore, PolicyService};
//! use tokio_util::sync::CancellationToken;
//!
//! let service = PolicyService::new(Arc::new(InMemoryPolicyStore::seeded()));
//! let exported = service
//!     .export_data(from, to, &CancellationToken::new())
//!     .await?;
//! ```

pub mod policy;
pub mod dto;
pub mod error;
pub mod ports;
pub mod memory;
pub mod seed;
pub mod services;

pub use policy::{Policy, NewPolicy, Note, PolicyWithNotes};
pub use dto::{ReadPolicyDto, CreatePolicyDto, ExportDto};
pub use error::ServiceError;
pub use ports::{PolicyStore, PolicyTransaction};
pub use memory::InMemoryPolicyStore;
pub use seed::{seed_policies, seed_notes};
pub use services::PolicyService;
