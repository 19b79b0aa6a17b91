//! Custom Test Assertions
//!
//! Assertion helpers for policy DTOs with messages that name the field that
//! differs.

use domain_policy::{CreatePolicyDto, ExportDto, ReadPolicyDto};

/// Asserts that a created policy echoes the fields of its input
///
/// A missing start date in the input is not compared.
///
/// # Panics
///
/// Panics if the number, premium or given start date differ
pub fn assert_echoes_input(created: &ReadPolicyDto, input: &CreatePolicyDto) {
    assert_eq!(
        Some(&created.policy_number),
        input.policy_number.as_ref(),
        "policyNumber mismatch"
    );
    assert_eq!(created.premium, input.premium, "premium mismatch");
    if let Some(start_date) = input.start_date {
        assert_eq!(created.start_date, start_date, "startDate mismatch");
    }
}

/// Asserts that an export row carries the policy fields and the note texts
pub fn assert_export_row(row: &ExportDto, policy: &ReadPolicyDto, notes: &[&str]) {
    assert_eq!(row.policy_number, policy.policy_number, "policyNumber mismatch");
    assert_eq!(row.premium, policy.premium, "premium mismatch");
    assert_eq!(row.start_date, policy.start_date, "startDate mismatch");
    assert_eq!(row.notes, notes, "notes mismatch for {}", row.policy_number);
}

/// Asserts that ids are strictly increasing
pub fn assert_ids_increasing(policies: &[ReadPolicyDto]) {
    for pair in policies.windows(2) {
        assert!(
            pair[0].id < pair[1].id,
            "ids out of order: {} then {}",
            pair[0].id,
            pair[1].id
        );
    }
}
