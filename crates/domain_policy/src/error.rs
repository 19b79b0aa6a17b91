//! Policy domain errors
//!
//! The policy service has exactly two failure channels besides its
//! ordinary "no result" values: cancellation, and a store fault on a read.

use thiserror::Error;

use core_kernel::PortError;

/// Errors returned by [`crate::PolicyService`]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller's cancellation token fired before the result was handed back
    #[error("Operation was cancelled")]
    Cancelled,

    /// The store failed during a read
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl ServiceError {
    /// Returns true if this error is the cancellation channel
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ServiceError::Cancelled)
    }
}
