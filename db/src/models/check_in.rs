use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::user;

/// Durable proof that a user attended a session. Unique per (session, user).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "check_ins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub source: CheckInSource,
    pub checked_in_at: DateTime<Utc>,
}

/// How a check-in came to exist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "check_in_source_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CheckInSource {
    /// The member submitted the session code.
    #[sea_orm(string_value = "code")]
    Code,

    /// A team administrator recorded the check-in on the member's behalf.
    #[sea_orm(string_value = "manual")]
    Manual,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Plain insert. A second row for the same (session, user) fails on the
    /// `idx_check_ins_session_user` unique index.
    pub async fn create<C>(
        db: &C,
        session_id: i64,
        user_id: i64,
        source: CheckInSource,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            session_id: Set(session_id),
            user_id: Set(user_id),
            source: Set(source),
            checked_in_at: Set(checked_in_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_for_user<C>(db: &C, session_id: i64, user_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn count_for_session<C>(db: &C, session_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await
    }

    /// All check-ins for a session with their users, oldest first.
    pub async fn list_with_users<C>(
        db: &C,
        session_id: i64,
    ) -> Result<Vec<(Model, Option<user::Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::CheckedInAt)
            .order_by_asc(Column::Id)
            .find_also_related(user::Entity)
            .all(db)
            .await
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }
}
