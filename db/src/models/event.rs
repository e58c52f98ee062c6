use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;

/// A scheduled team event. Check-in is accepted between
/// `start_time - grace_minutes` and `end_time + grace_minutes`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub team_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub grace_minutes: i32,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_delete = "Cascade"
    )]
    Team,
    #[sea_orm(has_one = "super::attendance_session::Entity")]
    AttendanceSession,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Partial update for an event. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub grace_minutes: Option<i32>,
}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        team_id: i64,
        created_by: i64,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        grace_minutes: i32,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            team_id: Set(team_id),
            created_by: Set(created_by),
            title: Set(title.to_owned()),
            start_time: Set(start_time),
            end_time: Set(end_time),
            grace_minutes: Set(grace_minutes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        changes: EventChanges,
    ) -> Result<Model, DbErr> {
        let mut event = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Some(title) = changes.title {
            event.title = Set(title);
        }
        if let Some(start) = changes.start_time {
            event.start_time = Set(start);
        }
        if let Some(end) = changes.end_time {
            event.end_time = Set(end);
        }
        if let Some(grace) = changes.grace_minutes {
            event.grace_minutes = Set(grace);
        }

        event.update(db).await
    }
}
