//! Administration of attendance sessions: opening one per event, cancelling or
//! reopening, rotating the code and reading the audit log.

use chrono::{DateTime, Utc};
use db::models::{
    attendance_session::{AttendanceStatus, Model as AttendanceSession},
    check_in::Model as CheckIn,
    event::{Entity as EventEntity, Model as Event},
    verification_attempt::Model as VerificationAttempt,
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, SqlErr};
use serde::Serialize;

use crate::access::{Actor, require_member, require_team_admin};
use crate::code::{generate_code, hash_code, is_well_formed, normalize_code};
use crate::error::AttendanceError;

pub const MAX_ATTEMPTS_PER_PAGE: u64 = 100;

/// A session together with the plaintext code it was just given. This is the
/// only place the plaintext ever leaves the service layer.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub session: AttendanceSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session: AttendanceSession,
    pub event: Event,
    pub check_in_count: u64,
    pub my_check_in: Option<CheckIn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptPage {
    pub attempts: Vec<VerificationAttempt>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

fn issue_code(code: Option<String>) -> Result<(String, String), AttendanceError> {
    let plain = match code {
        Some(raw) if !is_well_formed(&raw) => {
            return Err(AttendanceError::InvalidInput(
                "Code must be between 6 and 10 characters".into(),
            ));
        }
        Some(raw) => normalize_code(&raw),
        None => generate_code(),
    };
    let hash = hash_code(&plain).map_err(|e| AttendanceError::Hashing(e.to_string()))?;
    Ok((plain, hash))
}

async fn load(
    db: &DatabaseConnection,
    session_id: i64,
) -> Result<(AttendanceSession, Event), AttendanceError> {
    AttendanceSession::find_with_event(db, session_id)
        .await?
        .ok_or_else(|| AttendanceError::not_found("Attendance session not found"))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub struct AttendanceSessionService;

impl AttendanceSessionService {
    /// Opens the single attendance session for an event. A code is generated
    /// when none is supplied.
    pub async fn open(
        db: &DatabaseConnection,
        actor: Actor,
        event_id: i64,
        code: Option<String>,
    ) -> Result<IssuedSession, AttendanceError> {
        let event = EventEntity::find_by_id(event_id)
            .one(db)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Event not found"))?;
        require_team_admin(db, actor, event.team_id).await?;

        if AttendanceSession::find_for_event(db, event.id).await?.is_some() {
            return Err(AttendanceError::Conflict(
                "Event already has an attendance session".into(),
            ));
        }

        let (plain, hash) = issue_code(code)?;
        let session = match AttendanceSession::create(db, event.id, actor.user_id, &hash).await {
            Ok(session) => session,
            Err(err) if is_unique_violation(&err) => {
                return Err(AttendanceError::Conflict(
                    "Event already has an attendance session".into(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(session_id = session.id, event_id = event.id, by = actor.user_id, "Attendance session opened");
        Ok(IssuedSession {
            session,
            code: Some(plain),
        })
    }

    pub async fn summary(
        db: &DatabaseConnection,
        actor: Actor,
        session_id: i64,
    ) -> Result<SessionSummary, AttendanceError> {
        let (session, event) = load(db, session_id).await?;
        require_member(db, actor, event.team_id).await?;

        let check_in_count = CheckIn::count_for_session(db, session.id).await?;
        let my_check_in = CheckIn::find_for_user(db, session.id, actor.user_id).await?;
        Ok(SessionSummary {
            session,
            event,
            check_in_count,
            my_check_in,
        })
    }

    /// Cancels, reopens, and/or rotates the code. Rotation returns the new
    /// plaintext; existing check-ins are kept either way.
    pub async fn update(
        db: &DatabaseConnection,
        actor: Actor,
        session_id: i64,
        status: Option<AttendanceStatus>,
        code: Option<String>,
    ) -> Result<IssuedSession, AttendanceError> {
        let (session, event) = load(db, session_id).await?;
        require_team_admin(db, actor, event.team_id).await?;

        let (plain, hash) = match code {
            Some(raw) => {
                let (plain, hash) = issue_code(Some(raw))?;
                (Some(plain), Some(hash))
            }
            None => (None, None),
        };

        let rotated = hash.is_some();
        let session = AttendanceSession::update(db, session.id, status, hash).await?;
        tracing::info!(
            session_id = session.id,
            status = %session.status,
            rotated,
            by = actor.user_id,
            "Attendance session updated"
        );
        Ok(IssuedSession {
            session,
            code: plain,
        })
    }

    /// Deletes the session; its check-ins and attempts go with it.
    pub async fn delete(
        db: &DatabaseConnection,
        actor: Actor,
        session_id: i64,
    ) -> Result<(), AttendanceError> {
        let (session, event) = load(db, session_id).await?;
        require_team_admin(db, actor, event.team_id).await?;

        AttendanceSession::delete(db, session.id).await?;
        tracing::info!(session_id = session.id, by = actor.user_id, "Attendance session deleted");
        Ok(())
    }

    pub async fn attempts(
        db: &DatabaseConnection,
        actor: Actor,
        session_id: i64,
        success: Option<bool>,
        page: u64,
        per_page: u64,
    ) -> Result<AttemptPage, AttendanceError> {
        let (session, event) = load(db, session_id).await?;
        require_team_admin(db, actor, event.team_id).await?;

        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_ATTEMPTS_PER_PAGE);
        let (attempts, total) =
            VerificationAttempt::page(db, session.id, success, page, per_page).await?;
        Ok(AttemptPage {
            attempts,
            page,
            per_page,
            total,
        })
    }
}

/// Start and end of the accepting window, for display.
pub fn accepting_window(event: &Event) -> (DateTime<Utc>, DateTime<Utc>) {
    let grace = chrono::TimeDelta::try_minutes(i64::from(event.grace_minutes.max(0)))
        .unwrap_or_default();
    (
        event.start_time.checked_sub_signed(grace).unwrap_or(event.start_time),
        event.end_time.checked_add_signed(grace).unwrap_or(event.end_time),
    )
}
