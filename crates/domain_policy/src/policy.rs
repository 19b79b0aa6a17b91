//! Policy and note entities
//!
//! These are the persisted shapes. They never cross the HTTP boundary
//! directly; see [`crate::dto`] for the projections handed to callers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{NoteId, PolicyId};

/// A persisted insurance policy
///
/// `id` is assigned by the store exactly once, at insertion, and is never
/// changed afterwards. Every persisted policy carries a non-empty policy
/// number; the store refuses rows without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub policy_number: String,
    pub premium: Decimal,
    pub start_date: DateTime<Utc>,
}

/// Data for inserting a new policy
///
/// The policy number is optional here. Rejecting a missing number is the
/// store's job, reported as a constraint violation from `insert`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPolicy {
    pub policy_number: Option<String>,
    pub premium: Decimal,
    pub start_date: Option<DateTime<Utc>>,
}

impl NewPolicy {
    /// Start date to persist, falling back to the insertion time
    pub fn start_date_or_now(&self) -> DateTime<Utc> {
        self.start_date.unwrap_or_else(Utc::now)
    }

    /// Returns the policy number if it satisfies the NOT NULL / non-empty constraint
    pub fn required_policy_number(&self) -> Option<&str> {
        self.policy_number
            .as_deref()
            .filter(|number| !number.is_empty())
    }
}

/// Free-text annotation attached to a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub policy_id: PolicyId,
    pub text: String,
}

/// A policy joined with its notes, ordered by note id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyWithNotes {
    pub policy: Policy,
    pub notes: Vec<Note>,
}
