use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Append-only audit row describing one post-hoc edit of an attendance record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_corrections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attendance_id: i64,
    pub correction_type: CorrectionType,
    /// Field value before the correction, rendered as text. `None` when the
    /// field was unset (e.g. no check-out yet, no center).
    pub old_value: Option<String>,
    pub new_value: String,
    pub reason: String,
    pub corrected_by: String,
    pub created_at: DateTime<Utc>,
}

/// Which field of the attendance record a correction targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "correction_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CorrectionType {
    #[sea_orm(string_value = "CHECK_IN_TIME")]
    CheckInTime,

    #[sea_orm(string_value = "CHECK_OUT_TIME")]
    CheckOutTime,

    #[sea_orm(string_value = "PARTICIPATION_MODE")]
    ParticipationMode,

    #[sea_orm(string_value = "CENTER_CHANGE")]
    CenterChange,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_record::Entity",
        from = "Column::AttendanceId",
        to = "super::attendance_record::Column::Id"
    )]
    AttendanceRecord,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        attendance_id: i64,
        correction_type: CorrectionType,
        old_value: Option<String>,
        new_value: &str,
        reason: &str,
        corrected_by: &str,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            attendance_id: Set(attendance_id),
            correction_type: Set(correction_type),
            old_value: Set(old_value),
            new_value: Set(new_value.to_owned()),
            reason: Set(reason.to_owned()),
            corrected_by: Set(corrected_by.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    /// All corrections for a record, newest first.
    pub async fn find_for_attendance(
        db: &DbConn,
        attendance_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::AttendanceId.eq(attendance_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
