//! Boundary projections of the policy entities
//!
//! JSON field names are camelCase. Incoming timestamps accept RFC 3339,
//! naive date-times and bare dates (see [`core_kernel::temporal`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::PolicyId;

use crate::policy::{NewPolicy, Policy, PolicyWithNotes};

/// Policy as returned from read and create operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPolicyDto {
    pub id: PolicyId,
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
}

impl From<Policy> for ReadPolicyDto {
    fn from(policy: Policy) -> Self {
        Self {
            id: policy.id,
            policy_number: policy.policy_number,
            premium: policy.premium,
            start_date: policy.start_date,
        }
    }
}

/// Client input for creating a policy
///
/// Every field may be omitted; a missing policy number is rejected by the
/// store, a missing premium is zero and a missing start date becomes the
/// creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyDto {
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub premium: Decimal,
    #[serde(
        default,
        deserialize_with = "core_kernel::temporal::lenient::option::deserialize"
    )]
    pub start_date: Option<DateTime<Utc>>,
}

impl From<CreatePolicyDto> for NewPolicy {
    fn from(dto: CreatePolicyDto) -> Self {
        Self {
            policy_number: dto.policy_number,
            premium: dto.premium,
            start_date: dto.start_date,
        }
    }
}

/// Export row: a policy with the text of its notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDto {
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl From<PolicyWithNotes> for ExportDto {
    fn from(row: PolicyWithNotes) -> Self {
        Self {
            policy_number: row.policy.policy_number,
            premium: row.policy.premium,
            start_date: row.policy.start_date,
            notes: row.notes.into_iter().map(|note| note.text).collect(),
        }
    }
}
