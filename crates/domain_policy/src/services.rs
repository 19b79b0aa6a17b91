//! Policy domain services
//!
//! [`PolicyService`] mediates between DTO-shaped client intents and a
//! [`PolicyStore`]. It owns the one business rule of the domain (a policy
//! needs a number, enforced by the store) and the transactional and
//! cancellation behaviour of each operation.
//!
//! # Exit channels
//!
//! | Outcome                         | create          | read one         | read all / export |
//! |---------------------------------|-----------------|------------------|-------------------|
//! | success                         | `Ok(Some(dto))` | `Ok(Some(dto))`  | `Ok(vec)`         |
//! | rejected / store fault          | `Ok(None)`      | `Err(Store)`     | `Err(Store)`      |
//! | no such policy                  | n/a             | `Ok(None)`       | n/a               |
//! | cancellation token fired        | `Err(Cancelled)`| `Err(Cancelled)` | `Err(Cancelled)`  |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn, Span};

use core_kernel::{PolicyId, PortError};

use crate::dto::{CreatePolicyDto, ExportDto, ReadPolicyDto};
use crate::error::ServiceError;
use crate::ports::{PolicyStore, PolicyTransaction};

/// Service for reading, creating and exporting policies
///
/// Holds no per-request state; one instance is shared by every request.
///
/// # Example
///
/// ```rust,ignore
/// let service = PolicyService::new(Arc::new(InMemoryPolicyStore::seeded()));
/// let token = CancellationToken::new();
/// let policy = service.read_policy(PolicyId::new(1), &token).await?;
/// ```
#[derive(Clone)]
pub struct PolicyService {
    store: Arc<dyn PolicyStore>,
    span: Span,
}

impl PolicyService {
    /// Creates a service logging under a default `policy_service` span
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self::with_span(store, tracing::info_span!("policy_service"))
    }

    /// Creates a service logging under the given span
    ///
    /// # Arguments
    ///
    /// * `store` - The store every operation goes through
    /// * `span` - Parent span for every event the service emits
    pub fn with_span(store: Arc<dyn PolicyStore>, span: Span) -> Self {
        Self { store, span }
    }

    /// Returns the store the service reads and writes
    pub fn store(&self) -> &Arc<dyn PolicyStore> {
        &self.store
    }

    /// Creates a policy inside a store transaction
    ///
    /// The insert runs, then the token is checked, then the transaction
    /// commits. Any store failure rolls back, is logged once at `ERROR` with
    /// the input fields, and comes back as `Ok(None)`. A fired token rolls
    /// back and comes back as `Err(ServiceError::Cancelled)`, even when the
    /// insert itself failed.
    ///
    /// # Arguments
    ///
    /// * `input` - Client-supplied policy fields
    /// * `cancel` - Cancellation token, checked before commit
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Cancelled`]; store faults never escape.
    pub async fn create_policy(
        &self,
        input: CreatePolicyDto,
        cancel: &CancellationToken,
    ) -> Result<Option<ReadPolicyDto>, ServiceError> {
        let mut tx = match self.store.begin().await {
            Ok(tx) => tx,
            Err(err) => {
                // Nothing was opened, so a fired token has nothing to roll back.
                if cancel.is_cancelled() {
                    return Err(self.cancelled("create_policy"));
                }
                self.log_create_failure(&input, &err);
                return Ok(None);
            }
        };

        let inserted = tx.insert(input.clone().into()).await;

        if cancel.is_cancelled() {
            self.rollback(tx).await;
            return Err(self.cancelled("create_policy"));
        }

        let policy = match inserted {
            Ok(policy) => policy,
            Err(err) => {
                self.rollback(tx).await;
                self.log_create_failure(&input, &err);
                return Ok(None);
            }
        };

        // A failed commit leaves nothing behind; the store discards the transaction.
        if let Err(err) = tx.commit().await {
            self.log_create_failure(&input, &err);
            return Ok(None);
        }

        debug!(parent: &self.span, policy_id = %policy.id, "Policy created");
        Ok(Some(policy.into()))
    }

    /// Retrieves a policy by id
    ///
    /// A missing id is `Ok(None)` whatever the token says. A found row is
    /// only returned if the token has not fired by the time the lookup
    /// completes; otherwise it is dropped and the call is cancelled.
    pub async fn read_policy(
        &self,
        id: PolicyId,
        cancel: &CancellationToken,
    ) -> Result<Option<ReadPolicyDto>, ServiceError> {
        let Some(policy) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        self.ensure_not_cancelled(cancel, "read_policy")?;

        Ok(Some(policy.into()))
    }

    /// Retrieves every policy in store order
    pub async fn read_policies(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReadPolicyDto>, ServiceError> {
        let policies = self.store.list_all().await?;
        self.ensure_not_cancelled(cancel, "read_policies")?;

        Ok(policies.into_iter().map(ReadPolicyDto::from).collect())
    }

    /// Exports policies starting within `[start_date, end_date]` with their notes
    ///
    /// The range is not validated: `start_date > end_date` is an ordinary
    /// filter that matches nothing.
    pub async fn export_data(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExportDto>, ServiceError> {
        let rows = self.store.find_started_between(start_date, end_date).await?;
        self.ensure_not_cancelled(cancel, "export_data")?;

        debug!(
            parent: &self.span,
            %start_date,
            %end_date,
            exported = rows.len(),
            "Export assembled"
        );
        Ok(rows.into_iter().map(ExportDto::from).collect())
    }

    fn ensure_not_cancelled(
        &self,
        cancel: &CancellationToken,
        operation: &'static str,
    ) -> Result<(), ServiceError> {
        if cancel.is_cancelled() {
            return Err(self.cancelled(operation));
        }
        Ok(())
    }

    fn cancelled(&self, operation: &'static str) -> ServiceError {
        warn!(parent: &self.span, operation, "Operation cancelled");
        ServiceError::Cancelled
    }

    async fn rollback(&self, tx: Box<dyn PolicyTransaction>) {
        if let Err(err) = tx.rollback().await {
            warn!(parent: &self.span, error = %err, "Rollback failed");
        }
    }

    fn log_create_failure(&self, input: &CreatePolicyDto, err: &PortError) {
        error!(
            parent: &self.span,
            policy_number = ?input.policy_number,
            premium = %input.premium,
            start_date = ?input.start_date,
            error = %err,
            "Failed to create policy"
        );
    }
}

impl std::fmt::Debug for PolicyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyService").finish_non_exhaustive()
    }
}

