use chrono::{DateTime, Utc};
use db::models::event::{Entity as EventEntity, EventChanges, Model as Event};
use db::models::team::Entity as TeamEntity;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::access::{Actor, require_member, require_team_admin};
use crate::error::AttendanceError;

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub team_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub grace_minutes: i32,
}

fn check_schedule(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    grace_minutes: i32,
) -> Result<(), AttendanceError> {
    if end < start {
        return Err(AttendanceError::InvalidInput(
            "end_time must not be before start_time".into(),
        ));
    }
    if grace_minutes < 0 {
        return Err(AttendanceError::InvalidInput(
            "grace_minutes must not be negative".into(),
        ));
    }
    Ok(())
}

fn clean_title(title: &str) -> Result<String, AttendanceError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AttendanceError::InvalidInput("Title must not be blank".into()));
    }
    Ok(title.to_owned())
}

pub struct EventService;

impl EventService {
    pub async fn create(
        db: &DatabaseConnection,
        actor: Actor,
        params: CreateEvent,
    ) -> Result<Event, AttendanceError> {
        TeamEntity::find_by_id(params.team_id)
            .one(db)
            .await?
            .ok_or_else(|| AttendanceError::not_found("Team not found"))?;
        require_team_admin(db, actor, params.team_id).await?;
        let title = clean_title(&params.title)?;
        check_schedule(params.start_time, params.end_time, params.grace_minutes)?;

        let event = Event::create(
            db,
            params.team_id,
            actor.user_id,
            &title,
            params.start_time,
            params.end_time,
            params.grace_minutes,
        )
        .await?;
        tracing::info!(event_id = event.id, team_id = event.team_id, "Event created");
        Ok(event)
    }

    pub async fn get(
        db: &DatabaseConnection,
        actor: Actor,
        event_id: i64,
    ) -> Result<Event, AttendanceError> {
        let event = find(db, event_id).await?;
        require_member(db, actor, event.team_id).await?;
        Ok(event)
    }

    /// Applies a partial update. The merged schedule must still be valid.
    pub async fn update(
        db: &DatabaseConnection,
        actor: Actor,
        event_id: i64,
        changes: EventChanges,
    ) -> Result<Event, AttendanceError> {
        let event = find(db, event_id).await?;
        require_team_admin(db, actor, event.team_id).await?;

        check_schedule(
            changes.start_time.unwrap_or(event.start_time),
            changes.end_time.unwrap_or(event.end_time),
            changes.grace_minutes.unwrap_or(event.grace_minutes),
        )?;

        let changes = EventChanges {
            title: changes.title.as_deref().map(clean_title).transpose()?,
            ..changes
        };
        Ok(Event::update(db, event.id, changes).await?)
    }
}

async fn find(db: &DatabaseConnection, event_id: i64) -> Result<Event, AttendanceError> {
    EventEntity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| AttendanceError::not_found("Event not found"))
}
