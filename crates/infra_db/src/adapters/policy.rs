//! PostgreSQL Policy Store
//!
//! Implements [`PolicyStore`] on top of [`PolicyRepository`]. Each
//! [`PolicyTransaction`] wraps a live `sqlx` transaction; SQLx rolls it back
//! when it is dropped without a commit.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresPolicyStore;
//! use domain_policy::PolicyStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn PolicyStore> = Arc::new(PostgresPolicyStore::new(pool));
//! let policy = store.find_by_id(PolicyId::new(1)).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PolicyId, PortError};
use domain_policy::{NewPolicy, Note, Policy, PolicyStore, PolicyTransaction, PolicyWithNotes};

use crate::error::DatabaseError;
use crate::repositories::{NewPolicyRow, PolicyRepository};

const ADAPTER_ID: &str = "postgres-policy-store";

/// PostgreSQL-backed implementation of [`PolicyStore`]
///
/// Health checks run `SELECT 1` against the pool.
#[derive(Debug, Clone)]
pub struct PostgresPolicyStore {
    repository: PolicyRepository,
}

impl PostgresPolicyStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PolicyRepository::new(pool),
        }
    }

    /// Returns the underlying repository
    pub fn repository(&self) -> &PolicyRepository {
        &self.repository
    }
}

impl DomainPort for PostgresPolicyStore {}

#[async_trait]
impl HealthCheckable for PostgresPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.repository.pool())
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(
                ADAPTER_ID,
                latency_ms,
                format!("Database error: {}", e),
            ),
        }
    }
}

#[async_trait]
impl PolicyStore for PostgresPolicyStore {
    #[instrument(skip(self), fields(policy_id = %id))]
    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        let row = self.repository.find_by_id(id.value()).await?;
        Ok(row.map(Policy::from))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Policy>, PortError> {
        let rows = self.repository.list_all().await?;
        Ok(rows.into_iter().map(Policy::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_started_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithNotes>, PortError> {
        let policies = self.repository.find_started_between(from, to).await?;
        let ids: Vec<i32> = policies.iter().map(|row| row.id).collect();
        let notes = self.repository.notes_for(&ids).await?;

        let mut notes_by_policy: HashMap<i32, Vec<Note>> = HashMap::new();
        for note in notes {
            notes_by_policy
                .entry(note.policy_id)
                .or_default()
                .push(note.into());
        }

        let rows = policies
            .into_iter()
            .map(|row| {
                let notes = notes_by_policy.remove(&row.id).unwrap_or_default();
                PolicyWithNotes {
                    policy: row.into(),
                    notes,
                }
            })
            .collect();

        Ok(rows)
    }

    async fn begin(&self) -> Result<Box<dyn PolicyTransaction>, PortError> {
        let tx = self
            .repository
            .pool()
            .begin()
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(Box::new(PgPolicyTransaction { tx }))
    }
}

/// An open PostgreSQL write transaction
pub struct PgPolicyTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PolicyTransaction for PgPolicyTransaction {
    async fn insert(&mut self, policy: NewPolicy) -> Result<Policy, PortError> {
        let policy_number = policy
            .required_policy_number()
            .ok_or_else(|| {
                PortError::validation_field("policy number is required", "policy_number")
            })?
            .to_string();

        let row = NewPolicyRow {
            policy_number,
            premium: policy.premium,
            start_date: policy.start_date_or_now(),
        };

        let stored = PolicyRepository::insert(&mut *self.tx, &row).await?;
        debug!(policy_id = stored.id, "Policy row inserted");
        Ok(stored.into())
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        self.tx
            .commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }
}
