//! Bulk-sync orchestrator for offline kiosk batches.
//!
//! Every record runs through the same pipeline as a live check-in (idempotency
//! cache, then conflict resolution, then the write) and ends in exactly one
//! [`SyncOutcome`]. A failing record never aborts the rest of the batch.
//!
//! Records are grouped by registration. Groups run concurrently on a bounded
//! pool while records inside a group run in array order, so two writes for the
//! same registration are never in flight together within one batch. Across
//! batches the unique index on `registration_id` arbitrates, and the loser of
//! that race is reported as a conflict.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use db::models::attendance_record::{CheckInMethod, Model as AttendanceRecord, NewAttendanceRecord};
use futures::stream::{self, StreamExt};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::conflict::{self, IncomingCheckIn, Resolution};
use crate::error::{AttendanceError, AttendanceResult, is_unique_violation};
use crate::idempotency::{CachedOutcome, IdempotencyStore};
use crate::registration::RegistrationLookup;

/// One offline check-in as collected by a kiosk.
#[derive(Debug, Clone)]
pub struct SyncRecord {
    pub event_id: String,
    pub registration_id: String,
    pub center_id: Option<String>,
    pub check_in_method: CheckInMethod,
    /// When the check-in actually happened, not when it was synced.
    pub check_in_time: DateTime<Utc>,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Success { record_id: i64 },
    Duplicate { record_id: i64 },
    Conflict { record_id: i64 },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Duplicate,
    Conflict,
    Error,
}

impl SyncOutcome {
    pub fn status(&self) -> SyncStatus {
        match self {
            SyncOutcome::Success { .. } => SyncStatus::Success,
            SyncOutcome::Duplicate { .. } => SyncStatus::Duplicate,
            SyncOutcome::Conflict { .. } => SyncStatus::Conflict,
            SyncOutcome::Error { .. } => SyncStatus::Error,
        }
    }

    pub fn record_id(&self) -> Option<i64> {
        match self {
            SyncOutcome::Success { record_id }
            | SyncOutcome::Duplicate { record_id }
            | SyncOutcome::Conflict { record_id } => Some(*record_id),
            SyncOutcome::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SyncOutcome::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResult {
    pub idempotency_key: String,
    pub outcome: SyncOutcome,
}

/// Per-record results in input order plus summary counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub errors: usize,
    pub results: Vec<RecordResult>,
}

impl SyncReport {
    fn from_results(results: Vec<RecordResult>) -> Self {
        let mut report = SyncReport::default();

        for result in &results {
            match result.status() {
                SyncStatus::Success => report.synced += 1,
                SyncStatus::Duplicate => report.duplicates += 1,
                SyncStatus::Conflict => report.conflicts += 1,
                SyncStatus::Error => report.errors += 1,
            }
        }

        report.results = results;
        report
    }

    /// Only the records that failed, for the client's retry queue.
    pub fn error_details(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.outcome.message().map(|m| (r.idempotency_key.as_str(), m)))
    }
}

impl RecordResult {
    pub fn status(&self) -> SyncStatus {
        self.outcome.status()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BulkSyncOptions {
    /// Registration groups processed at the same time.
    pub concurrency: usize,
}

impl Default for BulkSyncOptions {
    fn default() -> Self {
        Self { concurrency: 8 }
    }
}

pub struct BulkSyncService;

impl BulkSyncService {
    pub async fn sync(
        db: &DatabaseConnection,
        cache: &dyn IdempotencyStore,
        records: Vec<SyncRecord>,
        options: BulkSyncOptions,
    ) -> SyncReport {
        let total = records.len();

        // A repeated key waits until its first occurrence has been cached.
        let mut seen_keys = HashSet::new();
        let mut deferred = Vec::new();
        let mut groups: Vec<Vec<(usize, SyncRecord)>> = Vec::new();
        let mut group_of: HashMap<String, usize> = HashMap::new();

        for (index, record) in records.into_iter().enumerate() {
            if !seen_keys.insert(record.idempotency_key.clone()) {
                deferred.push((index, record));
                continue;
            }

            let group = *group_of
                .entry(record.registration_id.clone())
                .or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
            groups[group].push((index, record));
        }

        let mut outcomes: Vec<Option<(String, SyncOutcome)>> = vec![None; total];

        let finished: Vec<Vec<(usize, String, SyncOutcome)>> = stream::iter(groups)
            .map(|group| async move {
                let mut done = Vec::with_capacity(group.len());
                for (index, record) in group {
                    let outcome = Self::process(db, cache, &record).await;
                    done.push((index, record.idempotency_key, outcome));
                }
                done
            })
            .buffer_unordered(options.concurrency.max(1))
            .collect()
            .await;

        for (index, key, outcome) in finished.into_iter().flatten() {
            outcomes[index] = Some((key, outcome));
        }

        for (index, record) in deferred {
            let outcome = Self::process(db, cache, &record).await;
            outcomes[index] = Some((record.idempotency_key, outcome));
        }

        let results = outcomes
            .into_iter()
            .flatten()
            .map(|(idempotency_key, outcome)| RecordResult {
                idempotency_key,
                outcome,
            })
            .collect();

        let report = SyncReport::from_results(results);
        info!(
            total,
            synced = report.synced,
            duplicates = report.duplicates,
            conflicts = report.conflicts,
            errors = report.errors,
            "Bulk sync batch processed"
        );

        report
    }

    async fn process(
        db: &DatabaseConnection,
        cache: &dyn IdempotencyStore,
        record: &SyncRecord,
    ) -> SyncOutcome {
        match Self::try_process(db, cache, record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    idempotency_key = %record.idempotency_key,
                    registration_id = %record.registration_id,
                    error = %e,
                    "Bulk sync record failed"
                );
                SyncOutcome::Error {
                    message: wire_message(&e),
                }
            }
        }
    }

    async fn try_process(
        db: &DatabaseConnection,
        cache: &dyn IdempotencyStore,
        record: &SyncRecord,
    ) -> AttendanceResult<SyncOutcome> {
        let key = record.idempotency_key.as_str();

        if let Some(cached) = cache.get(key).await? {
            return Ok(SyncOutcome::Duplicate {
                record_id: cached.record_id,
            });
        }

        let registration =
            RegistrationLookup::resolve_for_event(db, &record.registration_id, &record.event_id)
                .await?;

        let incoming = IncomingCheckIn {
            check_in_time: record.check_in_time,
            check_in_method: record.check_in_method,
        };

        let existing = AttendanceRecord::find_by_registration(db, &registration.id).await?;
        if let Some(existing) = existing {
            return Ok(Self::settle_existing(cache, key, &existing, &incoming).await);
        }

        let center_id =
            RegistrationLookup::resolve_center(db, &registration, record.center_id.as_deref())
                .await?;

        let new = NewAttendanceRecord {
            event_id: registration.event_id.clone(),
            registration_id: registration.id.clone(),
            member_id: registration.member_id.clone(),
            center_id,
            participation_mode: registration.effective_mode(),
            check_in_method: record.check_in_method,
            check_in_time: record.check_in_time,
            notes: None,
        };

        match AttendanceRecord::create(db, new).await {
            Ok(created) => {
                remember(cache, key, CachedOutcome::success(created.id)).await;
                Ok(SyncOutcome::Success {
                    record_id: created.id,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                debug!(
                    registration_id = %registration.id,
                    idempotency_key = key,
                    "Lost check-in race, reclassifying against the winning record"
                );
                let winner = AttendanceRecord::find_by_registration(db, &registration.id)
                    .await?
                    .ok_or(AttendanceError::Database(e))?;
                Ok(Self::settle_existing(cache, key, &winner, &incoming).await)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Classifies a record whose registration is already checked in and caches
    /// the outcome under its key.
    async fn settle_existing(
        cache: &dyn IdempotencyStore,
        key: &str,
        existing: &AttendanceRecord,
        incoming: &IncomingCheckIn,
    ) -> SyncOutcome {
        let (to_cache, outcome) = match conflict::resolve(Some(existing), incoming) {
            Resolution::Duplicate(id) => (
                CachedOutcome::success(id),
                SyncOutcome::Duplicate { record_id: id },
            ),
            Resolution::Conflict(id) => (
                CachedOutcome::conflict(id),
                SyncOutcome::Conflict { record_id: id },
            ),
            // Not reachable with a record in hand; settle it as a conflict anyway.
            Resolution::ProceedToWrite => (
                CachedOutcome::conflict(existing.id),
                SyncOutcome::Conflict {
                    record_id: existing.id,
                },
            ),
        };

        match remember(cache, key, to_cache).await {
            Some(cached) => SyncOutcome::Duplicate {
                record_id: cached.record_id,
            },
            None => outcome,
        }
    }
}

/// Business-rule messages go back to the kiosk as-is; storage detail stays in the log.
fn wire_message(err: &AttendanceError) -> String {
    match err {
        AttendanceError::Database(_) => "Internal error while storing the record".to_owned(),
        other => other.to_string(),
    }
}

/// Writes `outcome` under `key`, returning an entry a concurrent request stored first.
///
/// A cache failure is logged and swallowed: the record itself is already settled,
/// and a later resend is still caught by the conflict check.
async fn remember(
    cache: &dyn IdempotencyStore,
    key: &str,
    outcome: CachedOutcome,
) -> Option<CachedOutcome> {
    match cache.put_if_absent(key, outcome).await {
        Ok(existing) => existing,
        Err(e) => {
            warn!(idempotency_key = key, error = %e, "Failed to cache sync outcome");
            None
        }
    }
}
