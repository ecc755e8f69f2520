use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202412010001_create_registrations::Migration),
            Box::new(migrations::m202412010002_create_attendance::Migration),
            Box::new(migrations::m202412010003_create_attendance_codes::Migration),
            Box::new(migrations::m202412010004_create_idempotency_keys::Migration),
        ]
    }
}
