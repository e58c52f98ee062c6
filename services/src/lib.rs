pub mod access;
pub mod attempt_limiter;
pub mod attempt_logger;
pub mod attendance_session;
pub mod check_in;
pub mod check_in_recorder;
pub mod code;
pub mod error;
pub mod event;
pub mod window;

pub use error::AttendanceError;
