use chrono::{DateTime, Utc};
use db::models::{
    attendance_session::Model as AttendanceSession,
    check_in::{CheckInSource, Entity as CheckInEntity, Model as CheckIn},
    team_membership::Model as TeamMembership,
    user::{Entity as UserEntity, Model as User},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::access::{Actor, require_team_admin};
use crate::attempt_limiter::{AttemptPolicy, is_rate_limited};
use crate::attempt_logger::log_attempt;
use crate::check_in_recorder::{CheckInOutcome, record_check_in};
use crate::code::verify_code;
use crate::error::AttendanceError;
use crate::window::is_within_window;

/// One code submission from an authenticated member.
#[derive(Debug, Clone)]
pub struct CheckInRequest<'a> {
    pub session_id: i64,
    pub user_id: i64,
    pub code: &'a str,
    pub client_ip: Option<&'a str>,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CheckInResult {
    pub check_in: CheckIn,
    pub outcome: CheckInOutcome,
}

impl CheckInResult {
    pub fn already_checked_in(&self) -> bool {
        self.outcome == CheckInOutcome::AlreadyCheckedIn
    }
}

pub struct CheckInService;

impl CheckInService {
    /// Runs a member's code submission through every gate, in order:
    /// session lookup, membership, cancellation, time window, attempt limit,
    /// code verification. Only attempts that reach verification are logged.
    pub async fn check_in(
        db: &DatabaseConnection,
        req: CheckInRequest<'_>,
        policy: AttemptPolicy,
    ) -> Result<CheckInResult, AttendanceError> {
        let (session, event) = AttendanceSession::find_with_event(db, req.session_id)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Attendance session not found"))?;

        if !TeamMembership::is_member(db, req.user_id, event.team_id).await? {
            return Err(AttendanceError::forbidden("You are not a member of this team"));
        }

        if !session.is_open() {
            tracing::info!(session_id = session.id, user_id = req.user_id, "Check-in on cancelled session");
            return Err(AttendanceError::SessionCancelled);
        }

        if !is_within_window(
            event.start_time,
            event.end_time,
            i64::from(event.grace_minutes),
            req.now,
        ) {
            tracing::info!(session_id = session.id, user_id = req.user_id, "Check-in outside window");
            return Err(AttendanceError::OutsideWindow {
                event_start: event.start_time,
                event_end: event.end_time,
                grace_minutes: event.grace_minutes,
            });
        }

        if is_rate_limited(db, session.id, req.user_id, req.client_ip, policy, req.now).await? {
            tracing::warn!(
                session_id = session.id,
                user_id = req.user_id,
                ip = req.client_ip.unwrap_or("unknown"),
                "Check-in rate limited"
            );
            return Err(AttendanceError::RateLimited);
        }

        let matched = verify_code(req.code, &session.code_hash);
        log_attempt(db, session.id, req.user_id, req.client_ip, matched, req.now).await;

        if !matched {
            tracing::info!(session_id = session.id, user_id = req.user_id, "Check-in code mismatch");
            return Err(AttendanceError::InvalidCode);
        }

        let (check_in, outcome) =
            record_check_in(db, session.id, req.user_id, CheckInSource::Code, req.now).await?;
        Ok(CheckInResult { check_in, outcome })
    }

    /// Admin records a check-in for a member without a code. Same idempotency
    /// as a code check-in; window and cancellation do not apply.
    pub async fn check_in_manually(
        db: &DatabaseConnection,
        session_id: i64,
        actor: Actor,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<CheckInResult, AttendanceError> {
        let (session, event) = AttendanceSession::find_with_event(db, session_id)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Attendance session not found"))?;
        require_team_admin(db, actor, event.team_id).await?;

        if !TeamMembership::is_member(db, user_id, event.team_id).await? {
            return Err(AttendanceError::not_found("User is not a member of this team"));
        }

        let (check_in, outcome) =
            record_check_in(db, session.id, user_id, CheckInSource::Manual, now).await?;
        tracing::info!(session_id, user_id, by = actor.user_id, "Manual check-in recorded");
        Ok(CheckInResult { check_in, outcome })
    }

    /// Deletes a check-in, returning the user it belonged to. The pair goes
    /// back to not-checked-in; the attempt log is untouched.
    pub async fn remove(
        db: &DatabaseConnection,
        session_id: i64,
        check_in_id: i64,
        actor: Actor,
    ) -> Result<User, AttendanceError> {
        let (_, event) = AttendanceSession::find_with_event(db, session_id)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Attendance session not found"))?;
        require_team_admin(db, actor, event.team_id).await?;

        let (check_in, user) = CheckInEntity::find_by_id(check_in_id)
            .find_also_related(UserEntity)
            .one(db)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Check-in not found"))?;

        if check_in.session_id != session_id {
            return Err(AttendanceError::InvalidInput(
                "Check-in does not belong to this attendance session".into(),
            ));
        }
        let user = user.ok_or_else(|| AttendanceError::not_found("Checked-in user not found"))?;

        CheckIn::delete(db, check_in.id).await?;
        tracing::info!(session_id, check_in_id, user_id = user.id, by = actor.user_id, "Check-in removed");
        Ok(user)
    }

    pub async fn list(
        db: &DatabaseConnection,
        session_id: i64,
        actor: Actor,
    ) -> Result<Vec<(CheckIn, Option<User>)>, AttendanceError> {
        let (session, event) = AttendanceSession::find_with_event(db, session_id)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Attendance session not found"))?;
        require_team_admin(db, actor, event.team_id).await?;

        Ok(CheckIn::list_with_users(db, session.id).await?)
    }
}
