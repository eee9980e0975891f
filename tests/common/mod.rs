/// Common test utilities and helpers for integration tests.
///
/// Provides the proptest configuration preset and shared generators for
/// dates and recurrence rules.
use chrono::{NaiveDate, Weekday};
use proptest::prelude::*;

use daylist::recurrence::RecurrenceRule;

/// Standard proptest configuration with 100 iterations.
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Arbitrary date in a range every frequency can work with. Days are
/// capped at 28 so generated dates exist in every month.
pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Non-empty weekday set.
pub fn arb_weekdays() -> impl Strategy<Value = Vec<Weekday>> {
    prop::collection::vec(0usize..7, 1..=7)
        .prop_map(|idxs| idxs.into_iter().map(|i| WEEKDAYS[i]).collect())
}

/// Arbitrary valid rule across all four frequencies, with an optional
/// until date after the start.
pub fn arb_rule() -> impl Strategy<Value = RecurrenceRule> {
    let base = prop_oneof![
        (1u32..=30, arb_date()).prop_map(|(i, s)| RecurrenceRule::daily(i, s).unwrap()),
        (1u32..=8, arb_weekdays(), arb_date())
            .prop_map(|(i, w, s)| RecurrenceRule::weekly(i, w, s).unwrap()),
        (1u32..=12, 1u32..=31, arb_date())
            .prop_map(|(i, d, s)| RecurrenceRule::monthly(i, d, s).unwrap()),
        (1u32..=4, 1u32..=12, 1u32..=28, arb_date())
            .prop_map(|(i, m, d, s)| RecurrenceRule::yearly(i, m, d, s).unwrap()),
    ];
    (base, 1i64..=720, any::<bool>()).prop_map(|(rule, days, bounded)| {
        if bounded {
            let until = rule.start() + chrono::Duration::days(days);
            rule.with_until(until)
        } else {
            rule
        }
    })
}
