//! Date and time sampling for availability slots.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;
use time::macros::time;
use time::{Date, Duration, PrimitiveDateTime, Time};

/// Days a slot stays listed after its meeting date.
pub const EXPIRY_GRACE_DAYS: i64 = 30;

/// Picks a date `today + n` days with `n` drawn uniformly from `offset_days`.
pub fn random_date(today: Date, offset_days: &RangeInclusive<i64>, rng: &mut impl Rng) -> Date {
    today + Duration::days(rng.gen_range(offset_days.clone()))
}

/// Picks one of the configured meeting start times.
///
/// Returns `None` only when `hours` is empty.
pub fn random_time(hours: &[Time], rng: &mut impl Rng) -> Option<Time> {
    hours.choose(rng).copied()
}

/// End of the meeting day plus the expiry grace period.
pub fn expires_at(date: Date) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, time!(23:59:59)) + Duration::days(EXPIRY_GRACE_DAYS)
}
