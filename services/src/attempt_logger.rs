use chrono::{DateTime, Utc};
use db::models::verification_attempt::Model as VerificationAttempt;
use sea_orm::ConnectionTrait;

/// Appends one verification attempt. Best effort: a failed write is logged and
/// swallowed so the caller's request still completes.
pub async fn log_attempt<C>(
    db: &C,
    session_id: i64,
    user_id: i64,
    client_ip: Option<&str>,
    success: bool,
    now: DateTime<Utc>,
) -> Option<VerificationAttempt>
where
    C: ConnectionTrait,
{
    match VerificationAttempt::log(db, session_id, user_id, client_ip, success, now).await {
        Ok(attempt) => Some(attempt),
        Err(e) => {
            tracing::warn!(
                error = %e,
                session_id,
                user_id,
                success,
                "Failed to write verification attempt"
            );
            None
        }
    }
}
