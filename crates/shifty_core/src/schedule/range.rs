//! Day-granular date-range membership.
//!
//! # Invariants
//! - An absent end date means a single-day range, never an unbounded one.
//! - Both range ends are inclusive.

use chrono::{NaiveDate, NaiveDateTime};

/// Returns whether `day` falls inside `[start, end.unwrap_or(start)]`.
pub fn is_active_on(day: NaiveDate, start: NaiveDate, end: Option<NaiveDate>) -> bool {
    start <= day && day <= end.unwrap_or(start)
}

/// Same as [`is_active_on`] for a point in time; the time of day is ignored.
pub fn is_active_at(moment: NaiveDateTime, start: NaiveDate, end: Option<NaiveDate>) -> bool {
    is_active_on(moment.date(), start, end)
}
