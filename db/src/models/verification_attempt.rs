use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, Set};
use serde::Serialize;

/// Append-only audit entry for one code submission. Never updated or deleted
/// individually; rows go away only when their session is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "verification_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub client_ip: Option<String>,
    pub success: bool,
    pub attempted_at: DateTime<Utc>,
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

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn log<C>(
        db: &C,
        session_id: i64,
        user_id: i64,
        client_ip: Option<&str>,
        success: bool,
        attempted_at: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            session_id: Set(session_id),
            user_id: Set(user_id),
            client_ip: Set(client_ip.map(str::to_owned)),
            success: Set(success),
            attempted_at: Set(attempted_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Counts attempts on `session_id` since `since` made by `user_id` or, when
    /// known, from `client_ip`.
    pub async fn count_recent<C>(
        db: &C,
        session_id: i64,
        user_id: i64,
        client_ip: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut actor = Condition::any().add(Column::UserId.eq(user_id));
        if let Some(ip) = client_ip {
            actor = actor.add(Column::ClientIp.eq(ip));
        }

        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::AttemptedAt.gte(since))
            .filter(actor)
            .count(db)
            .await
    }

    /// One page of the audit log, newest first. `page` is 1-based.
    pub async fn page<C>(
        db: &C,
        session_id: i64,
        success: Option<bool>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Model>, u64), DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = Entity::find().filter(Column::SessionId.eq(session_id));
        if let Some(success) = success {
            query = query.filter(Column::Success.eq(success));
        }

        let paginator = query
            .order_by_desc(Column::AttemptedAt)
            .order_by_desc(Column::Id)
            .paginate(db, per_page.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
