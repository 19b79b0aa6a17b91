//! Store Test Doubles
//!
//! [`PolicyStore`] implementations that fail or cancel on demand, for
//! exercising the error paths of the service and the HTTP layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PolicyId, PortError};
use domain_policy::{
    InMemoryPolicyStore, NewPolicy, Policy, PolicyStore, PolicyTransaction, PolicyWithNotes,
};
use tokio_util::sync::CancellationToken;

const FAILING_ADAPTER_ID: &str = "failing-policy-store";

/// A store whose every operation fails with a connection error
#[derive(Debug, Clone, Default)]
pub struct FailingPolicyStore;

impl FailingPolicyStore {
    fn error() -> PortError {
        PortError::connection("policy store unavailable")
    }
}

impl DomainPort for FailingPolicyStore {}

#[async_trait]
impl HealthCheckable for FailingPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy(FAILING_ADAPTER_ID, 0, "policy store unavailable")
    }
}

#[async_trait]
impl PolicyStore for FailingPolicyStore {
    async fn find_by_id(&self, _id: PolicyId) -> Result<Option<Policy>, PortError> {
        Err(Self::error())
    }

    async fn list_all(&self) -> Result<Vec<Policy>, PortError> {
        Err(Self::error())
    }

    async fn find_started_between(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithNotes>, PortError> {
        Err(Self::error())
    }

    async fn begin(&self) -> Result<Box<dyn PolicyTransaction>, PortError> {
        Err(Self::error())
    }
}

/// Wraps an in-memory store and fires a token while a store call runs
///
/// Models a client that disconnects, or a server that shuts down, after the
/// store call started but before the service checks for cancellation.
#[derive(Debug, Clone)]
pub struct CancellingPolicyStore {
    inner: InMemoryPolicyStore,
    token: CancellationToken,
    calls: Arc<AtomicUsize>,
}

impl CancellingPolicyStore {
    pub fn new(inner: InMemoryPolicyStore, token: CancellationToken) -> Self {
        Self {
            inner,
            token,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of store calls that ran to completion
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fire(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.cancel();
    }
}

impl DomainPort for CancellingPolicyStore {}

#[async_trait]
impl HealthCheckable for CancellingPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[async_trait]
impl PolicyStore for CancellingPolicyStore {
    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        let found = self.inner.find_by_id(id).await;
        self.fire();
        found
    }

    async fn list_all(&self) -> Result<Vec<Policy>, PortError> {
        let all = self.inner.list_all().await;
        self.fire();
        all
    }

    async fn find_started_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PolicyWithNotes>, PortError> {
        let rows = self.inner.find_started_between(from, to).await;
        self.fire();
        rows
    }

    async fn begin(&self) -> Result<Box<dyn PolicyTransaction>, PortError> {
        Ok(Box::new(CancellingTransaction {
            inner: self.inner.begin().await?,
            store: self.clone(),
        }))
    }
}

struct CancellingTransaction {
    inner: Box<dyn PolicyTransaction>,
    store: CancellingPolicyStore,
}

#[async_trait]
impl PolicyTransaction for CancellingTransaction {
    async fn insert(&mut self, policy: NewPolicy) -> Result<Policy, PortError> {
        let inserted = self.inner.insert(policy).await;
        self.store.fire();
        inserted
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        self.inner.rollback().await
    }
}
