//! Policy DTOs
//!
//! Request and response bodies are the domain DTOs; only the export query
//! string is specific to HTTP.

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub use domain_policy::{CreatePolicyDto, ExportDto, ReadPolicyDto};

/// Query string of `POST /policies/export`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    #[serde(deserialize_with = "core_kernel::temporal::lenient::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "core_kernel::temporal::lenient::deserialize")]
    pub end_date: DateTime<Utc>,
}
