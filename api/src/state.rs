use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use services::error::AttendanceResult;
use services::idempotency::{IdempotencyConfig, IdempotencyStore, build_store};
use util::config::{self, IdempotencyBackend};

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    idempotency: Arc<dyn IdempotencyStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, idempotency: Arc<dyn IdempotencyStore>) -> Self {
        Self { db, idempotency }
    }

    /// Builds the state with the idempotency backend selected in config.
    pub fn from_config(db: DatabaseConnection) -> AttendanceResult<Self> {
        let ttl = Duration::from_secs(config::idempotency_ttl_hours() * 60 * 60);

        let store_config = match config::idempotency_backend() {
            IdempotencyBackend::Memory => IdempotencyConfig::Memory {
                ttl,
                max_entries: config::idempotency_max_entries(),
            },
            IdempotencyBackend::Database => IdempotencyConfig::Database { ttl },
        };

        let idempotency = build_store(&db, store_config)?;
        Ok(Self::new(db, idempotency))
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn idempotency(&self) -> &dyn IdempotencyStore {
        self.idempotency.as_ref()
    }
}
