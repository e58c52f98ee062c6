//! Per-session throttle over the verification attempt log.
//!
//! There is no separate counter store: the append-only attempt log is the
//! source of truth. Two requests racing at the boundary can both pass before
//! either is logged, so the cap is a soft limit. The hashed code is what
//! actually protects a session.

use chrono::{DateTime, TimeDelta, Utc};
use db::models::verification_attempt::Model as VerificationAttempt;
use sea_orm::{ConnectionTrait, DbErr};
use util::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicy {
    pub max_attempts: u64,
    pub window_minutes: i64,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_minutes: 5,
        }
    }
}

impl AttemptPolicy {
    pub fn from_config() -> Self {
        Self {
            max_attempts: config::checkin_max_attempts(),
            window_minutes: config::checkin_attempt_window_minutes(),
        }
    }

    /// Start of the trailing window ending at `now`.
    fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::try_minutes(self.window_minutes.max(0))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// True when the user, or anyone at `client_ip`, already has `max_attempts`
/// attempts on this session inside the trailing window.
pub async fn is_rate_limited<C>(
    db: &C,
    session_id: i64,
    user_id: i64,
    client_ip: Option<&str>,
    policy: AttemptPolicy,
    now: DateTime<Utc>,
) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let recent =
        VerificationAttempt::count_recent(db, session_id, user_id, client_ip, policy.since(now))
            .await?;
    Ok(recent >= policy.max_attempts)
}
