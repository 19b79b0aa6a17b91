//! Test Data Builders
//!
//! Builders for policy inputs and rows. Tests set only the fields they care
//! about and take fixture defaults for the rest.

use chrono::{DateTime, Utc};
use core_kernel::{NoteId, PolicyId};
use domain_policy::{CreatePolicyDto, Note, Policy};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::fixtures::{StringFixtures, TemporalFixtures};

/// Builder for create-policy request bodies
#[derive(Debug, Clone)]
pub struct CreatePolicyDtoBuilder {
    policy_number: Option<String>,
    premium: Decimal,
    start_date: Option<DateTime<Utc>>,
}

impl Default for CreatePolicyDtoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreatePolicyDtoBuilder {
    /// Creates a builder for a valid input starting on 2024-01-01
    pub fn new() -> Self {
        Self {
            policy_number: Some(StringFixtures::fresh_policy_number().to_string()),
            premium: StringFixtures::premium(),
            start_date: Some(TemporalFixtures::new_year()),
        }
    }

    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = Some(number.into());
        self
    }

    /// Omits the policy number, which the store rejects
    pub fn without_policy_number(mut self) -> Self {
        self.policy_number = None;
        self
    }

    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.premium = premium;
        self
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Omits the start date, which defaults to the creation time
    pub fn without_start_date(mut self) -> Self {
        self.start_date = None;
        self
    }

    /// Builds the typed DTO
    pub fn build(self) -> CreatePolicyDto {
        CreatePolicyDto {
            policy_number: self.policy_number,
            premium: self.premium,
            start_date: self.start_date,
        }
    }

    /// Builds the camelCase JSON body, leaving out omitted fields
    pub fn build_json(self) -> Value {
        let mut body = json!({ "premium": self.premium });
        if let Some(number) = self.policy_number {
            body["policyNumber"] = json!(number);
        }
        if let Some(start_date) = self.start_date {
            body["startDate"] = json!(start_date.to_rfc3339());
        }
        body
    }
}

/// Builder for stored policy rows with explicit ids
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: Policy,
    notes: Vec<String>,
}

impl PolicyBuilder {
    pub fn new(id: i32) -> Self {
        Self {
            policy: Policy {
                id: PolicyId::new(id),
                policy_number: format!("TEST{:04}", id),
                premium: StringFixtures::premium(),
                start_date: TemporalFixtures::new_year(),
            },
            notes: Vec::new(),
        }
    }

    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy.policy_number = number.into();
        self
    }

    pub fn with_premium(mut self, premium: Decimal) -> Self {
        self.policy.premium = premium;
        self
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.policy.start_date = start_date;
        self
    }

    pub fn with_note(mut self, text: impl Into<String>) -> Self {
        self.notes.push(text.into());
        self
    }

    /// Builds the policy and its notes; note ids start at `first_note_id`
    pub fn build(self, first_note_id: i32) -> (Policy, Vec<Note>) {
        let policy_id = self.policy.id;
        let notes = self
            .notes
            .into_iter()
            .zip(first_note_id..)
            .map(|(text, id)| Note {
                id: NoteId::new(id),
                policy_id,
                text,
            })
            .collect();
        (self.policy, notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_json_omits_missing_fields() {
        let body = CreatePolicyDtoBuilder::new()
            .without_policy_number()
            .without_start_date()
            .with_premium(dec!(5))
            .build_json();

        assert!(body.get("policyNumber").is_none());
        assert!(body.get("startDate").is_none());
        assert!(body.get("premium").is_some());
    }

    #[test]
    fn test_policy_builder_numbers_notes() {
        let (policy, notes) = PolicyBuilder::new(10).with_note("a").with_note("b").build(20);

        assert_eq!(policy.id, PolicyId::new(10));
        assert_eq!(notes[1].id, NoteId::new(21));
        assert!(notes.iter().all(|n| n.policy_id == policy.id));
    }
}
