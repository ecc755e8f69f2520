use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Short-lived, single-use credential that can trigger a check-in.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub code_type: CodeType,
    pub event_id: String,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_code_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CodeType {
    #[sea_orm(string_value = "QR")]
    Qr,

    #[sea_orm(string_value = "SAC")]
    Sac,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        code: &str,
        code_type: CodeType,
        event_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            code: Set(code.to_owned()),
            code_type: Set(code_type),
            event_id: Set(event_id.to_owned()),
            expires_at: Set(expires_at),
            is_used: Set(false),
            used_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Code.eq(code)).one(db).await
    }

    /// Atomically spends the code if it is unused and unexpired at `now`.
    ///
    /// Returns `true` only for the single caller whose conditional update
    /// matched the row; every concurrent or later attempt gets `false`.
    pub async fn redeem<C: ConnectionTrait>(
        db: &C,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = Entity::update_many()
            .col_expr(Column::IsUsed, Expr::value(true))
            .col_expr(Column::UsedAt, Expr::value(Some(now)))
            .filter(Column::Code.eq(code))
            .filter(Column::IsUsed.eq(false))
            .filter(Column::ExpiresAt.gt(now))
            .exec(db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
