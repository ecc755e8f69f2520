use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A member's registration for an event.
///
/// Owned by the registration service; the attendance engine treats rows in this
/// table as read-only input to every check-in decision.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub event_id: String,
    pub member_id: String,
    /// Center assigned at registration time, if any.
    pub center_id: Option<String>,
    pub participation_mode: Option<ParticipationMode>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Attendance channel for an event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "participation_mode_type")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ParticipationMode {
    #[default]
    #[sea_orm(string_value = "ONLINE")]
    Online,

    #[sea_orm(string_value = "ONSITE")]
    Onsite,

    #[sea_orm(string_value = "HYBRID")]
    Hybrid,
}

impl ParticipationMode {
    /// Whether attending in this mode involves being physically at a center.
    pub fn is_in_person(self) -> bool {
        matches!(self, Self::Onsite | Self::Hybrid)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::center::Entity",
        from = "Column::CenterId",
        to = "super::center::Column::Id"
    )]
    Center,
}

impl Related<super::center::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Center.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        id: &str,
        event_id: &str,
        member_id: &str,
        center_id: Option<&str>,
        participation_mode: Option<ParticipationMode>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            id: Set(id.to_owned()),
            event_id: Set(event_id.to_owned()),
            member_id: Set(member_id.to_owned()),
            center_id: Set(center_id.map(str::to_owned)),
            participation_mode: Set(participation_mode),
            status: Set("CONFIRMED".to_owned()),
            created_at: Set(Utc::now()),
        };

        active_model.insert(db).await
    }

    /// Mode a check-in inherits; registrations without an assignment attend online.
    pub fn effective_mode(&self) -> ParticipationMode {
        self.participation_mode.unwrap_or_default()
    }
}
