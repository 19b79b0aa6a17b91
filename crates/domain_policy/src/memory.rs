//! In-memory policy store
//!
//! The default store for the service and for tests. Tables live behind a
//! shared `RwLock`; ordered maps give primary-key iteration order for free.
//! Transactions stage their inserts privately and publish them in one step
//! on commit, so readers never observe a half-written transaction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, NoteId, PolicyId, PortError};

use crate::policy::{NewPolicy, Note, Policy, PolicyWithNotes};
use crate::ports::{PolicyStore, PolicyTransaction};
use crate::seed::{seed_notes, seed_policies};

const ADAPTER_ID: &str = "in-memory-policy-store";

#[derive(Debug)]
struct Tables {
    policies: BTreeMap<PolicyId, Policy>,
    notes: BTreeMap<NoteId, Note>,
    /// Wider than an id so that loading `i32::MAX` cannot overflow it
    next_policy_id: i64,
}

impl Tables {
    fn advance_sequence_past(&mut self, id: PolicyId) {
        self.next_policy_id = self.next_policy_id.max(i64::from(id.value()) + 1);
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            policies: BTreeMap::new(),
            notes: BTreeMap::new(),
            next_policy_id: 1,
        }
    }
}

/// In-memory implementation of [`PolicyStore`]
///
/// Cloning yields another handle onto the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with the fixture policies and notes
    pub fn seeded() -> Self {
        let mut tables = Tables::default();
        for policy in seed_policies() {
            tables.advance_sequence_past(policy.id);
            tables.policies.insert(policy.id, policy);
        }
        for note in seed_notes() {
            tables.notes.insert(note.id, note);
        }
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Loads rows with explicit ids
    ///
    /// The whole batch is checked before anything is written: a duplicate
    /// policy or note id, in the store or within the batch, or a note pointing
    /// at a policy that exists in neither, rejects the batch with
    /// `PortError::Conflict`.
    pub async fn seed(&self, policies: Vec<Policy>, notes: Vec<Note>) -> Result<(), PortError> {
        let mut tables = self.tables.write().await;

        let mut batch_ids = BTreeSet::new();
        for policy in &policies {
            if tables.policies.contains_key(&policy.id) || !batch_ids.insert(policy.id) {
                return Err(PortError::conflict(format!("duplicate policy id {}", policy.id)));
            }
            if policy.policy_number.is_empty() {
                return Err(PortError::validation_field(
                    "policy number is required",
                    "policy_number",
                ));
            }
        }
        let mut batch_note_ids = BTreeSet::new();
        for note in &notes {
            if !tables.policies.contains_key(&note.policy_id) && !batch_ids.contains(&note.policy_id) {
                return Err(PortError::conflict(format!(
                    "note {} references missing policy {}",
                    note.id, note.policy_id
                )));
            }
            if tables.notes.contains_key(&note.id) || !batch_note_ids.insert(note.id) {
                return Err(PortError::conflict(format!("duplicate note id {}", note.id)));
            }
        }

        for policy in policies {
            tables.advance_sequence_past(policy.id);
            tables.policies.insert(policy.id, policy);
        }
        for note in notes {
            tables.notes.insert(note.id, note);
        }
        Ok(())
    }

    /// Number of committed policies
    pub async fn policy_count(&self) -> usize {
        self.tables.read().await.policies.len()
    }
}

impl DomainPort for InMemoryPolicyStore {}

#[async_trait]
impl HealthCheckable for InMemoryPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy(ADAPTER_ID, 0)
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        Ok(self.tables.read().await.policies.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Policy>, PortError> {
        Ok(self.tables.read().await.policies.values().cloned().collect())
    }

    async fn find_started_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithNotes>, PortError> {
        let tables = self.tables.read().await;

        let rows = tables
            .policies
            .values()
            .filter(|policy| from <= policy.start_date && policy.start_date <= to)
            .map(|policy| PolicyWithNotes {
                policy: policy.clone(),
                notes: tables
                    .notes
                    .values()
                    .filter(|note| note.policy_id == policy.id)
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(rows)
    }

    async fn begin(&self) -> Result<Box<dyn PolicyTransaction>, PortError> {
        Ok(Box::new(InMemoryTransaction {
            tables: Arc::clone(&self.tables),
            staged: Vec::new(),
        }))
    }
}

/// Write transaction over [`InMemoryPolicyStore`]
struct InMemoryTransaction {
    tables: Arc<RwLock<Tables>>,
    staged: Vec<Policy>,
}

#[async_trait]
impl PolicyTransaction for InMemoryTransaction {
    async fn insert(&mut self, policy: NewPolicy) -> Result<Policy, PortError> {
        let policy_number = policy
            .required_policy_number()
            .ok_or_else(|| {
                PortError::validation_field("policy number is required", "policy_number")
            })?
            .to_string();

        // Ids come from a sequence: a rolled-back insert leaves a gap.
        let id = {
            let mut tables = self.tables.write().await;
            let raw = i32::try_from(tables.next_policy_id)
                .map_err(|_| PortError::internal("policy id sequence exhausted"))?;
            tables.next_policy_id += 1;
            PolicyId::new(raw)
        };

        let row = Policy {
            id,
            policy_number,
            premium: policy.premium,
            start_date: policy.start_date_or_now(),
        };
        self.staged.push(row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        let InMemoryTransaction { tables, staged } = *self;
        debug!(rows = staged.len(), "Committing in-memory transaction");

        let mut tables = tables.write().await;
        for row in staged {
            tables.policies.insert(row.id, row);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        debug!(rows = self.staged.len(), "Rolling back in-memory transaction");
        Ok(())
    }
}
