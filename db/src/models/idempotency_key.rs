use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::SqlErr;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Write-once mapping from a client idempotency key to the outcome it produced.
///
/// Rows past `expires_at` are treated as absent and may be replaced.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "idempotency_keys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub record_id: i64,
    pub status: IdempotencyStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Terminal outcomes worth remembering. Errors are never stored so clients can retry them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "idempotency_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IdempotencyStatus {
    #[sea_orm(string_value = "success")]
    Success,

    #[sea_orm(string_value = "conflict")]
    Conflict,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Looks up a key that has not yet expired at `now`.
    pub async fn find_live(
        db: &DbConn,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(key.to_owned())
            .filter(Column::ExpiresAt.gt(now))
            .one(db)
            .await
    }

    /// Stores `key` unless a live entry already holds it.
    ///
    /// Returns `Ok(None)` when this call stored the entry and `Ok(Some(existing))`
    /// when another writer got there first. An expired row occupying the key is
    /// removed and the insert retried once.
    pub async fn insert_if_absent(
        db: &DbConn,
        key: &str,
        record_id: i64,
        status: IdempotencyStatus,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        for _ in 0..2 {
            let active_model = ActiveModel {
                key: Set(key.to_owned()),
                record_id: Set(record_id),
                status: Set(status),
                created_at: Set(now),
                expires_at: Set(expires_at),
            };

            match active_model.insert(db).await {
                Ok(_) => return Ok(None),
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    if let Some(existing) = Self::find_live(db, key, now).await? {
                        return Ok(Some(existing));
                    }
                    Entity::delete_many()
                        .filter(Column::Key.eq(key))
                        .filter(Column::ExpiresAt.lte(now))
                        .exec(db)
                        .await?;
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbErr::Custom(format!(
            "could not claim idempotency key '{key}'"
        )))
    }

    /// Deletes every entry that expired at or before `now`; returns how many went.
    pub async fn purge_expired(db: &DbConn, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::ExpiresAt.lte(now))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
