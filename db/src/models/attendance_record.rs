use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use super::registration::ParticipationMode;

/// Canonical check-in state for one registration.
///
/// `registration_id` is unique: at most one row ever exists per registration,
/// and the unique index is what arbitrates concurrent first check-ins.
/// Rows are never deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: String,
    #[sea_orm(unique)]
    pub registration_id: String,
    pub member_id: String,
    pub center_id: Option<String>,
    pub participation_mode: ParticipationMode,
    pub check_in_method: CheckInMethod,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub verified_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a check-in was triggered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "check_in_method_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CheckInMethod {
    #[sea_orm(string_value = "QR")]
    Qr,

    #[sea_orm(string_value = "SAC")]
    Sac,

    #[sea_orm(string_value = "MANUAL")]
    Manual,

    #[sea_orm(string_value = "KIOSK")]
    Kiosk,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::registration::Entity",
        from = "Column::RegistrationId",
        to = "super::registration::Column::Id"
    )]
    Registration,
    #[sea_orm(has_many = "super::attendance_correction::Entity")]
    Corrections,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl Related<super::attendance_correction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Corrections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Values for a first check-in. Everything else starts at its default.
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub event_id: String,
    pub registration_id: String,
    pub member_id: String,
    pub center_id: Option<String>,
    pub participation_mode: ParticipationMode,
    pub check_in_method: CheckInMethod,
    pub check_in_time: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Model {
    /// Inserts a first check-in. Fails with a unique-constraint violation if the
    /// registration already has a record.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new: NewAttendanceRecord,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            event_id: Set(new.event_id),
            registration_id: Set(new.registration_id),
            member_id: Set(new.member_id),
            center_id: Set(new.center_id),
            participation_mode: Set(new.participation_mode),
            check_in_method: Set(new.check_in_method),
            check_in_time: Set(new.check_in_time),
            check_out_time: Set(None),
            is_verified: Set(false),
            verified_by: Set(None),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_registration<C: ConnectionTrait>(
        db: &C,
        registration_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::RegistrationId.eq(registration_id))
            .one(db)
            .await
    }

    pub async fn find_by_event(db: &DbConn, event_id: &str) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .order_by_asc(Column::CheckInTime)
            .all(db)
            .await
    }

    /// Number of check-ins already recorded at a center for an event.
    pub async fn count_at_center(
        db: &DbConn,
        event_id: &str,
        center_id: &str,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .filter(Column::CenterId.eq(center_id))
            .count(db)
            .await
    }

    pub fn is_checked_out(&self) -> bool {
        self.check_out_time.is_some()
    }
}
