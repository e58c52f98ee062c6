pub mod attendance_session;
pub mod check_in;
pub mod event;
pub mod team;
pub mod team_membership;
pub mod user;
pub mod verification_attempt;

pub use attendance_session::Entity as AttendanceSession;
pub use check_in::Entity as CheckIn;
pub use event::Entity as Event;
pub use team::Entity as Team;
pub use team_membership::Entity as TeamMembership;
pub use user::Entity as User;
pub use verification_attempt::Entity as VerificationAttempt;
