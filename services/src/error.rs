use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

/// Failure taxonomy for attendance operations.
///
/// Variants are ordered roughly by where they are detected: authorization and
/// lookups first, then business rules, then the store.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Attendance session has been cancelled")]
    SessionCancelled,

    #[error("Check-in is not available at this time")]
    OutsideWindow {
        event_start: DateTime<Utc>,
        event_end: DateTime<Utc>,
        grace_minutes: i32,
    },

    #[error("Too many check-in attempts. Please wait before trying again")]
    RateLimited,

    #[error("Invalid attendance code")]
    InvalidCode,

    #[error("Failed to hash attendance code: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AttendanceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden(why: impl Into<String>) -> Self {
        Self::Forbidden(why.into())
    }
}
