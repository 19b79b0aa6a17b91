//! Pre-built Test Fixtures
//!
//! Ready-to-use dates, numbers and amounts for policy tests. Values match the
//! fixture rows the stores are seeded with, so tests can assert against them.

use chrono::{DateTime, Utc};
use core_kernel::{utc_midnight, PolicyId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 2024-01-01T00:00:00Z, a date no seeded policy starts on
    pub fn new_year() -> DateTime<Utc> {
        Self::day(2024, 1, 1)
    }

    /// 2024-01-02T00:00:00Z
    pub fn day_after_new_year() -> DateTime<Utc> {
        Self::day(2024, 1, 2)
    }

    /// Start date shared by seed policies 1 and 5
    pub fn april_first() -> DateTime<Utc> {
        Self::day(2024, 4, 1)
    }

    /// Start date of seed policy 2
    pub fn april_fifth() -> DateTime<Utc> {
        Self::day(2024, 4, 5)
    }

    /// A window long before any policy
    pub fn distant_past() -> (DateTime<Utc>, DateTime<Utc>) {
        (Self::day(2000, 1, 1), Self::day(2000, 3, 1))
    }

    fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        utc_midnight(year, month, day).unwrap_or_default()
    }
}

/// Fixture for the seeded policies
pub struct SeedFixtures;

impl SeedFixtures {
    /// Number of seeded policies
    pub const POLICY_COUNT: usize = 5;

    /// Highest seeded policy id
    pub fn max_id() -> PolicyId {
        PolicyId::new(5)
    }

    /// First id the store hands out after seeding
    pub fn next_id() -> PolicyId {
        PolicyId::new(6)
    }

    /// Policy numbers in id order
    pub fn policy_numbers() -> [&'static str; 5] {
        ["HSCX1001", "HSCX1002", "HSCX1003", "HSCX1004", "HSCX1005"]
    }

    /// Premium of seed policy 1
    pub fn first_premium() -> Decimal {
        dec!(200)
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// A policy number no seeded policy uses
    pub fn fresh_policy_number() -> &'static str {
        "HSCX9001"
    }

    /// Standard test premium
    pub fn premium() -> Decimal {
        dec!(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distant_past_is_ordered() {
        let (from, to) = TemporalFixtures::distant_past();
        assert!(from < to);
    }

    #[test]
    fn test_next_id_follows_max() {
        assert_eq!(SeedFixtures::next_id().value(), SeedFixtures::max_id().value() + 1);
    }
}
