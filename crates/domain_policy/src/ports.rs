//! Policy Domain Ports
//!
//! This module defines the port through which the policy service reaches its
//! store. Adapters live in this crate ([`crate::memory::InMemoryPolicyStore`])
//! and in `infra_db` (`PostgresPolicyStore`).
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{PolicyStore, InMemoryPolicyStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn PolicyStore> = Arc::new(InMemoryPolicyStore::seeded());
//! let policy = store.find_by_id(PolicyId::new(1)).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, HealthCheckable, PolicyId, PortError};

use crate::policy::{NewPolicy, Policy, PolicyWithNotes};

/// Read access and transaction factory for the policy tables
///
/// Implementations must hand out policies in primary-key order and assign
/// ids atomically and monotonically.
#[async_trait]
pub trait PolicyStore: DomainPort + HealthCheckable {
    /// Retrieves a policy by id
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no row has the id; absence is not an error.
    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError>;

    /// Retrieves every policy, ordered by id
    async fn list_all(&self) -> Result<Vec<Policy>, PortError>;

    /// Retrieves policies whose start date lies in `[from, to]`, with their notes
    ///
    /// An inverted range matches nothing.
    async fn find_started_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithNotes>, PortError>;

    /// Opens a write transaction
    async fn begin(&self) -> Result<Box<dyn PolicyTransaction>, PortError>;
}

/// A single open write transaction
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// every staged change, exactly as [`rollback`](Self::rollback) does.
#[async_trait]
pub trait PolicyTransaction: Send {
    /// Stages a policy insert and returns the row with its generated id
    ///
    /// # Errors
    ///
    /// `PortError::Validation` with field `policy_number` when the number is
    /// missing or empty.
    async fn insert(&mut self, policy: NewPolicy) -> Result<Policy, PortError>;

    /// Publishes every staged change
    async fn commit(self: Box<Self>) -> Result<(), PortError>;

    /// Discards every staged change
    async fn rollback(self: Box<Self>) -> Result<(), PortError>;
}
