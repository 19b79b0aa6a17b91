//! Fixture data loaded into a fresh store
//!
//! Five policies and five notes. Every store adapter seeds from these
//! functions so the in-memory and PostgreSQL stores start identical.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use core_kernel::{NoteId, PolicyId};

use crate::policy::{Note, Policy};

const POLICIES: &[(i32, &str, i64, (i32, u32, u32))] = &[
    (1, "HSCX1001", 200, (2024, 4, 1)),
    (2, "HSCX1002", 153, (2024, 4, 5)),
    (3, "HSCX1003", 220, (2024, 3, 10)),
    (4, "HSCX1004", 200, (2024, 5, 1)),
    (5, "HSCX1005", 100, (2024, 4, 1)),
];

const NOTES: &[(i32, &str, i32)] = &[
    (1, "Policy 1 Note 1", 1),
    (2, "Policy 1 Note 2", 1),
    (3, "Policy 2 Note 1", 2),
    (4, "Policy 3 Note 1", 3),
    (5, "Policy 5 Note 1", 5),
];

fn seed_date((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Seed policies, ordered by id
pub fn seed_policies() -> Vec<Policy> {
    POLICIES
        .iter()
        .map(|&(id, number, premium, date)| Policy {
            id: PolicyId::new(id),
            policy_number: number.to_string(),
            premium: Decimal::from(premium),
            start_date: seed_date(date),
        })
        .collect()
}

/// Seed notes, ordered by id
pub fn seed_notes() -> Vec<Note> {
    NOTES
        .iter()
        .map(|&(id, text, policy_id)| Note {
            id: NoteId::new(id),
            policy_id: PolicyId::new(policy_id),
            text: text.to_string(),
        })
        .collect()
}
