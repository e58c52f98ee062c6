use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Set, sea_query::OnConflict};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The user-team-role relationship.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "team_memberships")]
pub struct Model {
    /// Team ID (foreign key to `teams`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub team_id: i64,

    /// User ID (foreign key to `users`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Role of a user within a team.
/// Backed by a `team_role_type` enum in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "team_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "member")]
    Member,
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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Adds the user to the team, or changes their role if already a member.
    pub async fn assign_user_to_team(
        db: &DatabaseConnection,
        user_id: i64,
        team_id: i64,
        role: Role,
    ) -> Result<(), DbErr> {
        let membership = ActiveModel {
            team_id: Set(team_id),
            user_id: Set(user_id),
            role: Set(role),
            joined_at: Set(Utc::now()),
        };

        Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([Column::TeamId, Column::UserId])
                    .update_column(Column::Role)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    pub async fn find_membership<C>(db: &C, user_id: i64, team_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id((team_id, user_id)).one(db).await
    }

    pub async fn is_member<C>(db: &C, user_id: i64, team_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find_membership(db, user_id, team_id).await?.is_some())
    }

    pub async fn is_admin<C>(db: &C, user_id: i64, team_id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find_membership(db, user_id, team_id)
            .await?
            .is_some_and(|m| m.role == Role::Admin))
    }
}
