use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use common::format_validation_errors;
use services::bulk_sync::{BulkSyncService, SyncRecord};
use services::check_in::CheckInService;
use services::code::CodeService;
use services::correction::CorrectionService;
use tracing::warn;
use util::config;
use validator::Validate;

use super::common::{
    AttendanceCodeResponse, AttendanceRecordResponse, BulkSyncReq, BulkSyncResponse, CheckInReq,
    CheckOutReq, CorrectReq, CorrectResponse, GenerateCodeReq, ValidateCodeReq, bad_body,
    bulk_sync_options, code_options, invalid,
};
use crate::{auth::AuthUser, response::ApiResponse, state::AppState};

/// POST /attendance/check-in
///
/// Records a live check-in at the current server time.
///
/// ### Request Body
/// ```json
/// {
///   "eventId": "evt-1",
///   "registrationId": "reg-1",
///   "centerId": "c-north",
///   "checkInMethod": "SAC",
///   "code": "K7PX2M"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the new record
/// - `400 Bad Request` already checked in, center mismatch, capacity, bad code
/// - `404 Not Found` unknown registration, center or code
pub async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CheckInReq>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    if let Err(e) = req.validate() {
        return invalid(format_validation_errors(&e));
    }

    match CheckInService::check_in(state.db(), req.into(), user.actor()).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(record.into(), "Check-in recorded")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// POST /attendance/check-out
///
/// `checkOutTime` is optional and defaults to now.
pub async fn check_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CheckOutReq>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    if let Err(e) = req.validate() {
        return invalid(format_validation_errors(&e));
    }

    match CheckInService::check_out(
        state.db(),
        &req.event_id,
        &req.registration_id,
        req.check_out_time,
        user.actor(),
    )
    .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(record.into(), "Check-out recorded")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// POST /attendance/bulk-sync
///
/// Merges a batch of offline check-ins. Each record gets its own status, so a
/// processed batch always answers `207 Multi-Status`.
///
/// ### Request Body
/// ```json
/// {
///   "records": [
///     {
///       "idempotencyKey": "k1",
///       "eventId": "evt-1",
///       "registrationId": "reg-1",
///       "checkInMethod": "KIOSK",
///       "checkInTime": "2024-12-01T09:15:00Z"
///     }
///   ]
/// }
/// ```
///
/// ### Responses
/// - `207 Multi-Status`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "synced": 1, "duplicates": 0, "conflicts": 0, "errors": 0,
///     "results": [{ "idempotencyKey": "k1", "status": "success", "recordId": 1 }],
///     "errorDetails": []
///   },
///   "message": "Bulk sync processed"
/// }
/// ```
/// - `400 Bad Request` empty or malformed batch, or too many records
/// - `503 Service Unavailable` the batch did not finish in time; finished records stay committed
pub async fn bulk_sync(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<BulkSyncReq>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<BulkSyncResponse>>) {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    if let Err(e) = req.validate() {
        return invalid(format_validation_errors(&e));
    }

    let max_records = config::bulk_sync_max_records();
    if req.records.len() > max_records {
        return invalid(format!(
            "Batch of {} records exceeds the limit of {max_records}",
            req.records.len()
        ));
    }

    let records: Vec<SyncRecord> = req.records.into_iter().map(Into::into).collect();
    let total = records.len();
    let budget = Duration::from_millis(config::bulk_sync_timeout_ms());

    let sync = BulkSyncService::sync(
        state.db(),
        state.idempotency(),
        records,
        bulk_sync_options(),
    );

    match tokio::time::timeout(budget, sync).await {
        Ok(report) => (
            StatusCode::MULTI_STATUS,
            Json(ApiResponse::success(report.into(), "Bulk sync processed")),
        ),
        Err(_) => {
            warn!(actor = user.actor(), total, "Bulk sync timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error(
                    "Bulk sync timed out; resend the batch with the same idempotency keys",
                )),
            )
        }
    }
}

/// POST /attendance/{attendance_id}/correct
///
/// ### Request Body
/// ```json
/// {
///   "correctionType": "CHECK_IN_TIME",
///   "newValue": "2024-12-01T09:05:00Z",
///   "reason": "Kiosk clock was ten minutes fast"
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ correction, updated }`
/// - `400 Bad Request` unparsable value or time ordering violated
/// - `404 Not Found` unknown record or center
pub async fn correct(
    State(state): State<AppState>,
    Path(attendance_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CorrectReq>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<CorrectResponse>>) {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    if let Err(e) = req.validate() {
        return invalid(format_validation_errors(&e));
    }

    match CorrectionService::correct(state.db(), attendance_id, req.into(), user.actor()).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(outcome.into(), "Attendance corrected")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// POST /attendance/{attendance_id}/verify
pub async fn verify(
    State(state): State<AppState>,
    Path(attendance_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    match CheckInService::verify(state.db(), attendance_id, user.actor()).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(record.into(), "Attendance verified")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// POST /attendance/code/generate
///
/// Body `{ "eventId": "evt-1", "codeType": "SAC" }`. Answers `201 Created`.
pub async fn generate_code(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCodeReq>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<AttendanceCodeResponse>>) {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    if let Err(e) = req.validate() {
        return invalid(format_validation_errors(&e));
    }

    match CodeService::generate(state.db(), &req.event_id, req.code_type, code_options()).await {
        Ok(code) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(code.into(), "Attendance code generated")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// POST /attendance/code/validate
///
/// Body `{ "code": "K7PX2M" }`. Redeems the code; `404` if unknown, `400` if
/// already used or expired.
pub async fn validate_code(
    State(state): State<AppState>,
    payload: Result<Json<ValidateCodeReq>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<AttendanceCodeResponse>>) {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    if let Err(e) = req.validate() {
        return invalid(format_validation_errors(&e));
    }

    match CodeService::validate(state.db(), &req.code).await {
        Ok(code) => (
            StatusCode::OK,
            Json(ApiResponse::success(code.into(), "Attendance code redeemed")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}
