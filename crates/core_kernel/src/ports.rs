//! Port infrastructure shared by every store adapter
//!
//! ```text
//!   PolicyService
//!        |
//!   PolicyStore / PolicyTransaction      (domain_policy)
//!        |                    |
//!   in-memory store      PostgreSQL store (infra_db)
//! ```
//!
//! Adapters report failures as [`PortError`] and expose liveness through
//! [`HealthCheckable`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a store adapter
#[derive(Debug, Error)]
pub enum PortError {
    /// The store refused the data, e.g. a missing policy number
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Duplicate key or dangling reference
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The backing store could not be reached
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PortError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure attributed to one input field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// True for failures a retry may clear
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }

    /// True when the store rejected the data rather than failing itself
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, PortError::Validation { .. } | PortError::Conflict { .. })
    }
}

/// Marker for port traits; adapters are shared across tasks
pub trait DomainPort: Send + Sync + 'static {}

/// Coarse adapter status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Outcome of one adapter health probe, served by the readiness endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self::probe(adapter_id, AdapterHealth::Healthy, latency_ms, None)
    }

    /// Unhealthy result carrying the failure reason
    pub fn unhealthy(
        adapter_id: impl Into<String>,
        latency_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::probe(adapter_id, AdapterHealth::Unhealthy, latency_ms, Some(message.into()))
    }

    fn probe(
        adapter_id: impl Into<String>,
        status: AdapterHealth,
        latency_ms: u64,
        message: Option<String>,
    ) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status,
            latency_ms,
            message,
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Adapters that can probe their backing store
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
