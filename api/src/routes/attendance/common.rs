use std::borrow::Cow;

use chrono::{DateTime, Utc};
use db::models::{
    attendance_session::AttendanceStatus,
    check_in::{CheckInSource, Model as CheckIn},
    user::Model as User,
    verification_attempt::Model as VerificationAttempt,
};
use serde::{Deserialize, Serialize};
use services::code::is_well_formed;
use validator::{Validate, ValidationError};

use crate::routes::common::UserResponse;
use crate::routes::events::common::{EventResponse, SessionResponse};

/// Codes are 6–10 characters once surrounding whitespace is trimmed.
pub fn validate_code_shape(code: &str) -> Result<(), ValidationError> {
    if is_well_formed(code) {
        Ok(())
    } else {
        Err(ValidationError::new("code_shape")
            .with_message(Cow::Borrowed("Code must be between 6 and 10 characters")))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckInRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_code_shape"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSessionRequest {
    pub status: Option<AttendanceStatus>,
    #[validate(custom(function = "validate_code_shape"))]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManualCheckInRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttemptsQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: Option<u64>,
    pub success: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub source: CheckInSource,
    pub checked_in_at: String,
}

impl From<CheckIn> for CheckInResponse {
    fn from(c: CheckIn) -> Self {
        Self {
            id: c.id,
            session_id: c.session_id,
            user_id: c.user_id,
            source: c.source,
            checked_in_at: c.checked_in_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckInResultResponse {
    pub check_in: CheckInResponse,
    pub already_checked_in: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckInEntry {
    #[serde(flatten)]
    pub check_in: CheckInResponse,
    pub username: Option<String>,
}

impl From<(CheckIn, Option<User>)> for CheckInEntry {
    fn from((check_in, user): (CheckIn, Option<User>)) -> Self {
        Self {
            check_in: CheckInResponse::from(check_in),
            username: user.map(|u| u.username),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemovedCheckInResponse {
    pub removed_user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionSummaryResponse {
    pub session: SessionResponse,
    pub event: EventResponse,
    /// Earliest and latest instants a check-in is accepted, grace included.
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub check_in_count: u64,
    pub my_check_in: Option<CheckInResponse>,
}

#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub id: i64,
    pub user_id: i64,
    pub client_ip: Option<String>,
    pub success: bool,
    pub attempted_at: String,
}

impl From<VerificationAttempt> for AttemptResponse {
    fn from(a: VerificationAttempt) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            client_ip: a.client_ip,
            success: a.success,
            attempted_at: a.attempted_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttemptListResponse {
    pub attempts: Vec<AttemptResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}
