//! Single-record check-in, check-out and verification.

use chrono::{DateTime, Utc};
use db::models::attendance_record::{
    ActiveModel, CheckInMethod, Entity as AttendanceRecordEntity, Model as AttendanceRecord,
    NewAttendanceRecord,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::info;

use crate::code::CodeService;
use crate::conflict::{self, IncomingCheckIn, Resolution};
use crate::error::{AttendanceError, AttendanceResult, is_unique_violation};
use crate::registration::RegistrationLookup;

#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub event_id: String,
    pub registration_id: String,
    pub center_id: Option<String>,
    pub check_in_method: CheckInMethod,
    pub notes: Option<String>,
    /// QR/SAC code presented at check-in, redeemed as part of the operation.
    pub code: Option<String>,
}

pub struct CheckInService;

impl CheckInService {
    /// Records a live check-in at the current time.
    ///
    /// Fails fast: the first failing check is returned and nothing is written.
    /// Code redemption and the insert share one transaction, so a lost insert
    /// race leaves the presented code unspent.
    pub async fn check_in(
        db: &DatabaseConnection,
        req: CheckInRequest,
        actor: &str,
    ) -> AttendanceResult<AttendanceRecord> {
        let registration =
            RegistrationLookup::resolve_for_event(db, &req.registration_id, &req.event_id).await?;

        let now = Utc::now();
        let existing = AttendanceRecord::find_by_registration(db, &registration.id).await?;
        let incoming = IncomingCheckIn {
            check_in_time: now,
            check_in_method: req.check_in_method,
        };
        if conflict::resolve(existing.as_ref(), &incoming) != Resolution::ProceedToWrite {
            return Err(already_checked_in(&registration.id));
        }

        let center_id =
            RegistrationLookup::resolve_center(db, &registration, req.center_id.as_deref())
                .await?;

        let txn = db.begin().await?;

        if let Some(code) = req.code.as_deref() {
            CodeService::redeem_for_check_in(&txn, code, &req.event_id, req.check_in_method)
                .await?;
        }

        let new = NewAttendanceRecord {
            event_id: registration.event_id.clone(),
            registration_id: registration.id.clone(),
            member_id: registration.member_id.clone(),
            center_id,
            participation_mode: registration.effective_mode(),
            check_in_method: req.check_in_method,
            check_in_time: now,
            notes: req.notes,
        };

        let record = match AttendanceRecord::create(&txn, new).await {
            Ok(record) => record,
            Err(e) if is_unique_violation(&e) => return Err(already_checked_in(&registration.id)),
            Err(e) => return Err(e.into()),
        };
        txn.commit().await?;

        info!(
            record_id = record.id,
            registration_id = %record.registration_id,
            method = %record.check_in_method,
            actor,
            "Check-in recorded"
        );

        Ok(record)
    }

    /// Records the check-out for a registration's attendance.
    ///
    /// `at` defaults to now and may not precede the check-in.
    pub async fn check_out(
        db: &DatabaseConnection,
        event_id: &str,
        registration_id: &str,
        at: Option<DateTime<Utc>>,
        actor: &str,
    ) -> AttendanceResult<AttendanceRecord> {
        let record = AttendanceRecord::find_by_registration(db, registration_id)
            .await?
            .filter(|r| r.event_id == event_id)
            .ok_or_else(|| {
                AttendanceError::not_found(format!(
                    "No attendance found for registration {registration_id}"
                ))
            })?;

        if record.is_checked_out() {
            return Err(AttendanceError::validation("Attendance already checked out"));
        }

        let at = at.unwrap_or_else(Utc::now);
        if at < record.check_in_time {
            return Err(AttendanceError::validation(
                "Check-out time cannot be before check-in time",
            ));
        }

        let mut active: ActiveModel = record.into();
        active.check_out_time = Set(Some(at));
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        info!(record_id = updated.id, actor, "Check-out recorded");
        Ok(updated)
    }

    /// Marks an attendance record as verified by `actor`.
    pub async fn verify(
        db: &DatabaseConnection,
        attendance_id: i64,
        actor: &str,
    ) -> AttendanceResult<AttendanceRecord> {
        let record = Self::get(db, attendance_id).await?;

        if record.is_verified {
            return Err(AttendanceError::validation("Attendance already verified"));
        }

        let mut active: ActiveModel = record.into();
        active.is_verified = Set(true);
        active.verified_by = Set(Some(actor.to_owned()));
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    pub async fn get(db: &DatabaseConnection, attendance_id: i64) -> AttendanceResult<AttendanceRecord> {
        AttendanceRecordEntity::find_by_id(attendance_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                AttendanceError::not_found(format!("Attendance record {attendance_id} not found"))
            })
    }

    pub async fn list_for_event(
        db: &DatabaseConnection,
        event_id: &str,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        Ok(AttendanceRecord::find_by_event(db, event_id).await?)
    }
}

fn already_checked_in(registration_id: &str) -> AttendanceError {
    AttendanceError::validation(format!(
        "Attendance already recorded for registration {registration_id}"
    ))
}
