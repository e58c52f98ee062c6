//! Team-scoped authorization checks.
//!
//! Global admins pass every team-admin and membership check except the check-in
//! itself, which always requires a real membership.

use db::models::team_membership::Model as TeamMembership;
use sea_orm::ConnectionTrait;

use crate::error::AttendanceError;

/// The authenticated caller, as resolved from the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub admin: bool,
}

impl Actor {
    pub fn new(user_id: i64, admin: bool) -> Self {
        Self { user_id, admin }
    }
}

pub async fn require_member<C>(db: &C, actor: Actor, team_id: i64) -> Result<(), AttendanceError>
where
    C: ConnectionTrait,
{
    if actor.admin || TeamMembership::is_member(db, actor.user_id, team_id).await? {
        Ok(())
    } else {
        Err(AttendanceError::forbidden("You are not a member of this team"))
    }
}

pub async fn require_team_admin<C>(db: &C, actor: Actor, team_id: i64) -> Result<(), AttendanceError>
where
    C: ConnectionTrait,
{
    if actor.admin || TeamMembership::is_admin(db, actor.user_id, team_id).await? {
        Ok(())
    } else {
        Err(AttendanceError::forbidden("Team admin access required"))
    }
}
