//! Idempotency cache in front of the attendance store.
//!
//! Maps a client-generated idempotency key to the outcome its first delivery
//! produced. Entries are write-once and expire after the offline retry window.
//! The cache only ever answers "seen before, and with what result"; attendance
//! rows themselves stay owned by the store.
//!
//! Two backends are provided:
//! - [`MemoryIdempotencyStore`]: a process-local Moka cache. Correct for a
//!   single instance only; a second instance would not see its keys.
//! - [`DatabaseIdempotencyStore`]: the `idempotency_keys` table, shared by every
//!   instance on the same database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use db::models::idempotency_key::Model as IdempotencyKey;
pub use db::models::idempotency_key::IdempotencyStatus;
use moka::future::Cache;
use sea_orm::DatabaseConnection;

use crate::error::{AttendanceError, AttendanceResult};

/// Outcome remembered for a processed idempotency key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedOutcome {
    pub record_id: i64,
    pub status: IdempotencyStatus,
}

impl CachedOutcome {
    pub fn success(record_id: i64) -> Self {
        Self {
            record_id,
            status: IdempotencyStatus::Success,
        }
    }

    pub fn conflict(record_id: i64) -> Self {
        Self {
            record_id,
            status: IdempotencyStatus::Conflict,
        }
    }
}

#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Returns the live outcome stored for `key`, if any.
    async fn get(&self, key: &str) -> AttendanceResult<Option<CachedOutcome>>;

    /// Stores `outcome` under `key` unless a live entry already exists.
    ///
    /// Returns `None` when this call stored the entry, otherwise the entry that
    /// was already there. Existing entries are never overwritten.
    async fn put_if_absent(
        &self,
        key: &str,
        outcome: CachedOutcome,
    ) -> AttendanceResult<Option<CachedOutcome>>;
}

pub struct MemoryIdempotencyStore {
    cache: Cache<String, CachedOutcome>,
}

impl MemoryIdempotencyStore {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl IdempotencyStore for MemoryIdempotencyStore {
    async fn get(&self, key: &str) -> AttendanceResult<Option<CachedOutcome>> {
        Ok(self.cache.get(key).await)
    }

    async fn put_if_absent(
        &self,
        key: &str,
        outcome: CachedOutcome,
    ) -> AttendanceResult<Option<CachedOutcome>> {
        let entry = self.cache.entry(key.to_owned()).or_insert(outcome).await;

        if entry.is_fresh() {
            Ok(None)
        } else {
            Ok(Some(entry.into_value()))
        }
    }
}

pub struct DatabaseIdempotencyStore {
    db: DatabaseConnection,
    ttl: chrono::Duration,
}

impl DatabaseIdempotencyStore {
    pub fn new(db: DatabaseConnection, ttl: Duration) -> AttendanceResult<Self> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| {
            AttendanceError::validation("Idempotency retention window is out of range")
        })?;

        Ok(Self { db, ttl })
    }

    /// Removes entries whose retention window has passed.
    pub async fn purge_expired(&self) -> AttendanceResult<u64> {
        Ok(IdempotencyKey::purge_expired(&self.db, Utc::now()).await?)
    }
}

#[async_trait]
impl IdempotencyStore for DatabaseIdempotencyStore {
    async fn get(&self, key: &str) -> AttendanceResult<Option<CachedOutcome>> {
        let found = IdempotencyKey::find_live(&self.db, key, Utc::now()).await?;

        Ok(found.map(|row| CachedOutcome {
            record_id: row.record_id,
            status: row.status,
        }))
    }

    async fn put_if_absent(
        &self,
        key: &str,
        outcome: CachedOutcome,
    ) -> AttendanceResult<Option<CachedOutcome>> {
        let now = Utc::now();
        let existing = IdempotencyKey::insert_if_absent(
            &self.db,
            key,
            outcome.record_id,
            outcome.status,
            now,
            now + self.ttl,
        )
        .await?;

        Ok(existing.map(|row| CachedOutcome {
            record_id: row.record_id,
            status: row.status,
        }))
    }
}

/// Which store to build, and how long its entries live.
#[derive(Debug, Clone, Copy)]
pub enum IdempotencyConfig {
    Memory { ttl: Duration, max_entries: u64 },
    Database { ttl: Duration },
}

/// Builds the configured store behind a shared handle.
pub fn build_store(
    db: &DatabaseConnection,
    config: IdempotencyConfig,
) -> AttendanceResult<Arc<dyn IdempotencyStore>> {
    Ok(match config {
        IdempotencyConfig::Memory { ttl, max_entries } => {
            Arc::new(MemoryIdempotencyStore::new(ttl, max_entries))
        }
        IdempotencyConfig::Database { ttl } => {
            Arc::new(DatabaseIdempotencyStore::new(db.clone(), ttl)?)
        }
    })
}
