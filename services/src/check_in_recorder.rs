//! Idempotent check-in persistence.

use chrono::{DateTime, Utc};
use db::models::check_in::{CheckInSource, Model as CheckIn};
use sea_orm::{ConnectionTrait, DbErr, SqlErr};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInOutcome {
    CheckedIn,
    AlreadyCheckedIn,
}

/// Returns the (session, user) check-in, creating it on first call.
///
/// A concurrent duplicate that loses the race on the unique index is answered
/// with the winner's row.
pub async fn record_check_in<C>(
    db: &C,
    session_id: i64,
    user_id: i64,
    source: CheckInSource,
    now: DateTime<Utc>,
) -> Result<(CheckIn, CheckInOutcome), DbErr>
where
    C: ConnectionTrait,
{
    if let Some(existing) = CheckIn::find_for_user(db, session_id, user_id).await? {
        return Ok((existing, CheckInOutcome::AlreadyCheckedIn));
    }

    match CheckIn::create(db, session_id, user_id, source, now).await {
        Ok(created) => Ok((created, CheckInOutcome::CheckedIn)),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            match CheckIn::find_for_user(db, session_id, user_id).await? {
                Some(existing) => Ok((existing, CheckInOutcome::AlreadyCheckedIn)),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
