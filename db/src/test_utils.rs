use crate::models::{
    center::Model as CenterModel,
    registration::{Model as RegistrationModel, ParticipationMode},
};
use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Inserts a center fixture.
pub async fn seed_center(db: &DatabaseConnection, id: &str, capacity: Option<i32>) -> CenterModel {
    CenterModel::create(db, id, &format!("Center {id}"), capacity)
        .await
        .expect("Failed to seed center")
}

/// Inserts a registration fixture for `member-<id>`.
pub async fn seed_registration(
    db: &DatabaseConnection,
    id: &str,
    event_id: &str,
    center_id: Option<&str>,
    mode: Option<ParticipationMode>,
) -> RegistrationModel {
    RegistrationModel::create(db, id, event_id, &format!("member-{id}"), center_id, mode)
        .await
        .expect("Failed to seed registration")
}
