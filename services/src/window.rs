//! Check-in time window.

use chrono::{DateTime, TimeDelta, Utc};

/// Returns true iff `start - grace <= now <= end + grace`.
///
/// Total over all inputs: negative grace counts as zero, an inverted window
/// (`end < start`) just contains nothing the grace does not cover, and a grace
/// too large to represent leaves that side unbounded.
pub fn is_within_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    grace_minutes: i64,
    now: DateTime<Utc>,
) -> bool {
    let Some(grace) = TimeDelta::try_minutes(grace_minutes.max(0)) else {
        return true;
    };

    let opens_ok = start.checked_sub_signed(grace).is_none_or(|opens| opens <= now);
    let closes_ok = end.checked_add_signed(grace).is_none_or(|closes| now <= closes);
    opens_ok && closes_ok
}
