use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use chrono::{DateTime, Utc};
use db::models::{
    attendance_code::{CodeType, Model as AttendanceCodeModel},
    attendance_correction::{CorrectionType, Model as CorrectionModel},
    attendance_record::{CheckInMethod, Model as AttendanceRecordModel},
};
use serde::{Deserialize, Serialize};
use services::bulk_sync::{BulkSyncOptions, SyncRecord, SyncReport, SyncStatus};
use services::check_in::CheckInRequest;
use services::code::CodeOptions;
use services::correction::{CorrectionOutcome, CorrectionRequest};
use util::config;
use validator::Validate;

use crate::response::ApiResponse;

// ---------- requests ----------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReq {
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "registrationId is required"))]
    pub registration_id: String,
    pub center_id: Option<String>,
    pub check_in_method: CheckInMethod,
    pub notes: Option<String>,
    pub code: Option<String>,
}

impl From<CheckInReq> for CheckInRequest {
    fn from(req: CheckInReq) -> Self {
        Self {
            event_id: req.event_id,
            registration_id: req.registration_id,
            center_id: req.center_id,
            check_in_method: req.check_in_method,
            notes: req.notes,
            code: req.code,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutReq {
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "registrationId is required"))]
    pub registration_id: String,
    pub check_out_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkSyncRecordReq {
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "registrationId is required"))]
    pub registration_id: String,
    pub center_id: Option<String>,
    pub check_in_method: CheckInMethod,
    pub check_in_time: DateTime<Utc>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "idempotencyKey must be between 1 and 255 characters"
    ))]
    pub idempotency_key: String,
}

impl From<BulkSyncRecordReq> for SyncRecord {
    fn from(req: BulkSyncRecordReq) -> Self {
        Self {
            event_id: req.event_id,
            registration_id: req.registration_id,
            center_id: req.center_id,
            check_in_method: req.check_in_method,
            check_in_time: req.check_in_time,
            idempotency_key: req.idempotency_key,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkSyncReq {
    #[validate(length(min = 1, message = "records must not be empty"), nested)]
    pub records: Vec<BulkSyncRecordReq>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CorrectReq {
    pub correction_type: CorrectionType,
    #[validate(length(min = 1, message = "newValue is required"))]
    pub new_value: String,
    #[validate(length(min = 1, message = "reason is required"))]
    pub reason: String,
}

impl From<CorrectReq> for CorrectionRequest {
    fn from(req: CorrectReq) -> Self {
        Self {
            correction_type: req.correction_type,
            new_value: req.new_value,
            reason: req.reason,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeReq {
    #[validate(length(min = 1, message = "eventId is required"))]
    pub event_id: String,
    pub code_type: CodeType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ValidateCodeReq {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
}

// ---------- responses ----------

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub event_id: String,
    pub registration_id: String,
    pub member_id: String,
    pub center_id: Option<String>,
    pub participation_mode: String,
    pub check_in_method: String,
    pub check_in_time: String,
    pub check_out_time: Option<String>,
    pub is_verified: bool,
    pub verified_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AttendanceRecordModel> for AttendanceRecordResponse {
    fn from(m: AttendanceRecordModel) -> Self {
        Self {
            id: m.id,
            event_id: m.event_id,
            registration_id: m.registration_id,
            member_id: m.member_id,
            center_id: m.center_id,
            participation_mode: m.participation_mode.to_string(),
            check_in_method: m.check_in_method.to_string(),
            check_in_time: m.check_in_time.to_rfc3339(),
            check_out_time: m.check_out_time.map(|t| t.to_rfc3339()),
            is_verified: m.is_verified,
            verified_by: m.verified_by,
            notes: m.notes,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResponse {
    pub id: i64,
    pub attendance_id: i64,
    pub correction_type: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub reason: String,
    pub corrected_by: String,
    pub created_at: String,
}

impl From<CorrectionModel> for CorrectionResponse {
    fn from(m: CorrectionModel) -> Self {
        Self {
            id: m.id,
            attendance_id: m.attendance_id,
            correction_type: m.correction_type.to_string(),
            old_value: m.old_value,
            new_value: m.new_value,
            reason: m.reason,
            corrected_by: m.corrected_by,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CorrectResponse {
    pub correction: CorrectionResponse,
    pub updated: AttendanceRecordResponse,
}

impl From<CorrectionOutcome> for CorrectResponse {
    fn from(outcome: CorrectionOutcome) -> Self {
        Self {
            correction: outcome.correction.into(),
            updated: outcome.updated.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCodeResponse {
    pub id: i64,
    pub code: String,
    pub code_type: String,
    pub event_id: String,
    pub expires_at: String,
    pub is_used: bool,
    pub used_at: Option<String>,
    pub created_at: String,
}

impl From<AttendanceCodeModel> for AttendanceCodeResponse {
    fn from(m: AttendanceCodeModel) -> Self {
        Self {
            id: m.id,
            code: m.code,
            code_type: m.code_type.to_string(),
            event_id: m.event_id,
            expires_at: m.expires_at.to_rfc3339(),
            is_used: m.is_used,
            used_at: m.used_at.map(|t| t.to_rfc3339()),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResultItem {
    pub idempotency_key: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncErrorItem {
    pub idempotency_key: String,
    pub error: String,
}

/// Bulk-sync body. `errors` is the count; the failed records are listed in `errorDetails`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSyncResponse {
    pub synced: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub errors: usize,
    pub results: Vec<SyncResultItem>,
    pub error_details: Vec<SyncErrorItem>,
}

impl From<SyncReport> for BulkSyncResponse {
    fn from(report: SyncReport) -> Self {
        let error_details = report
            .error_details()
            .map(|(key, error)| SyncErrorItem {
                idempotency_key: key.to_owned(),
                error: error.to_owned(),
            })
            .collect();

        let results = report
            .results
            .into_iter()
            .map(|r| SyncResultItem {
                status: r.status(),
                record_id: r.outcome.record_id(),
                message: r.outcome.message().map(str::to_owned),
                idempotency_key: r.idempotency_key,
            })
            .collect();

        Self {
            synced: report.synced,
            duplicates: report.duplicates,
            conflicts: report.conflicts,
            errors: report.errors,
            results,
            error_details,
        }
    }
}

// ---------- helpers ----------

/// Malformed JSON bodies answer 400 in the usual envelope.
pub fn bad_body<T>(rejection: JsonRejection) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(rejection.body_text())),
    )
}

pub fn invalid<T>(message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

pub fn code_options() -> CodeOptions {
    CodeOptions {
        validity: chrono::Duration::hours(config::code_validity_hours()),
        sac_length: config::sac_code_length(),
    }
}

pub fn bulk_sync_options() -> BulkSyncOptions {
    BulkSyncOptions {
        concurrency: config::bulk_sync_concurrency(),
    }
}
