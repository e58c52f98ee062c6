use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::event;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    #[serde(skip_serializing)]
    pub code_hash: String,
    pub status: AttendanceStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of an attendance session. Only administrators move it between states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "open")]
    Open,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::check_in::Entity")]
    CheckIns,
    #[sea_orm(has_many = "super::verification_attempt::Entity")]
    Attempts,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::check_in::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckIns.def()
    }
}

impl Related<super::verification_attempt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts an open session. Callers hash the code; this layer never sees plaintext.
    pub async fn create(
        db: &DatabaseConnection,
        event_id: i64,
        created_by: i64,
        code_hash: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            event_id: Set(event_id),
            created_by: Set(created_by),
            code_hash: Set(code_hash.to_owned()),
            status: Set(AttendanceStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Loads a session together with its owning event.
    pub async fn find_with_event<C>(db: &C, id: i64) -> Result<Option<(Model, event::Model)>, DbErr>
    where
        C: ConnectionTrait,
    {
        match Entity::find_by_id(id)
            .find_also_related(event::Entity)
            .one(db)
            .await?
        {
            Some((session, Some(event))) => Ok(Some((session, event))),
            Some((session, None)) => Err(DbErr::RecordNotFound(format!(
                "Event {} for attendance session {} not found",
                session.event_id, session.id
            ))),
            None => Ok(None),
        }
    }

    pub async fn find_for_event(db: &DatabaseConnection, event_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .one(db)
            .await
    }

    /// Applies an admin edit. `None` leaves the column untouched.
    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        status: Option<AttendanceStatus>,
        code_hash: Option<String>,
    ) -> Result<Model, DbErr> {
        let mut session = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(status) = status {
            session.status = Set(status);
        }
        if let Some(hash) = code_hash {
            session.code_hash = Set(hash);
        }
        session.update(db).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == AttendanceStatus::Open
    }
}
