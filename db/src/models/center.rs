use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

/// A physical venue an event runs at. Administered elsewhere; the attendance
/// engine only reads it to validate a check-in location and its capacity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "centers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// Soft seat limit. `None` means unlimited.
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        id: &str,
        name: &str,
        capacity: Option<i32>,
    ) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            id: Set(id.to_owned()),
            name: Set(name.to_owned()),
            capacity: Set(capacity),
            created_at: Set(Utc::now()),
        };

        active_model.insert(db).await
    }
}
