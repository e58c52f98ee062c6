use chrono::{DateTime, Utc};
use db::models::attendance_session::AttendanceStatus;
use serde::{Deserialize, Serialize};
use services::attendance_session::IssuedSession;
use validator::Validate;

use crate::routes::attendance::common::validate_code_shape;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(range(min = 0, max = 1440, message = "grace_minutes must be between 0 and 1440"))]
    pub grace_minutes: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 1440, message = "grace_minutes must be between 0 and 1440"))]
    pub grace_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct OpenAttendanceRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_code_shape"))]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub team_id: i64,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub grace_minutes: i32,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::event::Model> for EventResponse {
    fn from(e: db::models::event::Model) -> Self {
        Self {
            id: e.id,
            team_id: e.team_id,
            title: e.title,
            start_time: e.start_time.to_rfc3339(),
            end_time: e.end_time.to_rfc3339(),
            grace_minutes: e.grace_minutes,
            created_by: e.created_by,
            created_at: e.created_at.to_rfc3339(),
            updated_at: e.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub event_id: i64,
    pub status: AttendanceStatus,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::attendance_session::Model> for SessionResponse {
    fn from(s: db::models::attendance_session::Model) -> Self {
        Self {
            id: s.id,
            event_id: s.event_id,
            status: s.status,
            created_by: s.created_by,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// A session plus its plaintext code. Only produced right after the code is set.
#[derive(Debug, Serialize)]
pub struct IssuedSessionResponse {
    pub session: SessionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<IssuedSession> for IssuedSessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            session: SessionResponse::from(issued.session),
            code: issued.code,
        }
    }
}
