//! Correction log.
//!
//! The only path that may change a record's times, mode or center after it was
//! created. Each correction writes one audit row with the before and after
//! values and applies the new value in the same transaction.

use chrono::{DateTime, SecondsFormat, Utc};
use db::models::{
    attendance_correction::{CorrectionType, Model as AttendanceCorrection},
    attendance_record::{
        ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecordEntity,
        Model as AttendanceRecord, ParticipationMode,
    },
    center::Entity as CenterEntity,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::info;

use crate::error::{AttendanceError, AttendanceResult};

#[derive(Debug, Clone)]
pub struct CorrectionRequest {
    pub correction_type: CorrectionType,
    /// Timestamps as RFC 3339, modes as `ONLINE`/`ONSITE`/`HYBRID`, centers by id.
    pub new_value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    pub correction: AttendanceCorrection,
    pub updated: AttendanceRecord,
}

/// A parsed correction value, ready to apply.
enum Change {
    CheckInTime(DateTime<Utc>),
    CheckOutTime(DateTime<Utc>),
    Mode(ParticipationMode),
    Center(String),
}

pub struct CorrectionService;

impl CorrectionService {
    pub async fn correct(
        db: &DatabaseConnection,
        attendance_id: i64,
        req: CorrectionRequest,
        actor: &str,
    ) -> AttendanceResult<CorrectionOutcome> {
        let reason = req.reason.trim();
        if reason.is_empty() {
            return Err(AttendanceError::validation("A correction reason is required"));
        }

        let txn = db.begin().await?;

        let record = AttendanceRecordEntity::find_by_id(attendance_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AttendanceError::not_found(format!("Attendance record {attendance_id} not found"))
            })?;

        let change = parse_change(req.correction_type, &req.new_value)?;

        let (old_value, new_value) = match &change {
            Change::CheckInTime(at) => {
                if record.check_out_time.is_some_and(|out| *at > out) {
                    return Err(AttendanceError::validation(
                        "Check-in time cannot be after check-out time",
                    ));
                }
                (Some(render_time(record.check_in_time)), render_time(*at))
            }
            Change::CheckOutTime(at) => {
                if *at < record.check_in_time {
                    return Err(AttendanceError::validation(
                        "Check-out time cannot be before check-in time",
                    ));
                }
                (record.check_out_time.map(render_time), render_time(*at))
            }
            Change::Mode(mode) => (
                Some(record.participation_mode.to_string()),
                mode.to_string(),
            ),
            Change::Center(center_id) => {
                if CenterEntity::find_by_id(center_id.clone())
                    .one(&txn)
                    .await?
                    .is_none()
                {
                    return Err(AttendanceError::not_found(format!(
                        "Center {center_id} not found"
                    )));
                }
                (record.center_id.clone(), center_id.clone())
            }
        };

        let correction = AttendanceCorrection::create(
            &txn,
            record.id,
            req.correction_type,
            old_value,
            &new_value,
            reason,
            actor,
        )
        .await?;

        let mut active: AttendanceRecordActiveModel = record.into();
        match change {
            Change::CheckInTime(at) => active.check_in_time = Set(at),
            Change::CheckOutTime(at) => active.check_out_time = Set(Some(at)),
            Change::Mode(mode) => active.participation_mode = Set(mode),
            Change::Center(center_id) => active.center_id = Set(Some(center_id)),
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            attendance_id,
            correction_id = correction.id,
            correction_type = %correction.correction_type,
            actor,
            "Attendance corrected"
        );

        Ok(CorrectionOutcome {
            correction,
            updated,
        })
    }

    /// Corrections for a record, newest first.
    pub async fn history(
        db: &DatabaseConnection,
        attendance_id: i64,
    ) -> AttendanceResult<Vec<AttendanceCorrection>> {
        if AttendanceRecordEntity::find_by_id(attendance_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(AttendanceError::not_found(format!(
                "Attendance record {attendance_id} not found"
            )));
        }

        Ok(AttendanceCorrection::find_for_attendance(db, attendance_id).await?)
    }
}

fn parse_change(correction_type: CorrectionType, raw: &str) -> AttendanceResult<Change> {
    let raw = raw.trim();

    match correction_type {
        CorrectionType::CheckInTime => parse_time(raw).map(Change::CheckInTime),
        CorrectionType::CheckOutTime => parse_time(raw).map(Change::CheckOutTime),
        CorrectionType::ParticipationMode => raw
            .parse::<ParticipationMode>()
            .map(Change::Mode)
            .map_err(|_| {
                AttendanceError::validation(format!("Invalid participation mode '{raw}'"))
            }),
        CorrectionType::CenterChange if raw.is_empty() => {
            Err(AttendanceError::validation("Center id cannot be empty"))
        }
        CorrectionType::CenterChange => Ok(Change::Center(raw.to_owned())),
    }
}

fn parse_time(raw: &str) -> AttendanceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| AttendanceError::validation(format!("Invalid timestamp '{raw}'")))
}

fn render_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
