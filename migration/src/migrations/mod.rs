pub mod m202601100001_create_users;
pub mod m202601100002_create_teams;
pub mod m202601100003_create_team_memberships;
pub mod m202601100004_create_events;
pub mod m202601100005_create_attendance_sessions;
pub mod m202601100006_create_check_ins;
pub mod m202601100007_create_verification_attempts;
