//! Property-Based Test Generators
//!
//! Proptest strategies producing policy inputs the store accepts.

use chrono::{DateTime, Duration, Utc};
use core_kernel::utc_midnight;
use domain_policy::CreatePolicyDto;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-empty policy numbers
pub fn policy_number_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2,4}[0-9]{1,6}"
}

/// Strategy for premiums with up to two decimal places
pub fn premium_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64, 0u32..=2u32).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Strategy for whole-second start dates between 2000 and roughly 2054
pub fn start_date_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..20_000i64, 0i64..86_400i64).prop_map(|(days, seconds)| {
        utc_midnight(2000, 1, 1).unwrap_or_default()
            + Duration::days(days)
            + Duration::seconds(seconds)
    })
}

/// Strategy for valid create inputs
pub fn create_policy_strategy() -> impl Strategy<Value = CreatePolicyDto> {
    (policy_number_strategy(), premium_strategy(), start_date_strategy()).prop_map(
        |(number, premium, start_date)| CreatePolicyDto {
            policy_number: Some(number),
            premium,
            start_date: Some(start_date),
        },
    )
}

/// Strategy for date ranges, in either order
pub fn date_range_strategy() -> impl Strategy<Value = (DateTime<Utc>, DateTime<Utc>)> {
    (start_date_strategy(), start_date_strategy())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_generated_numbers_are_non_empty(number in policy_number_strategy()) {
            prop_assert!(!number.is_empty());
        }

        #[test]
        fn test_generated_premiums_are_non_negative(premium in premium_strategy()) {
            prop_assert!(premium >= Decimal::ZERO);
        }
    }
}
