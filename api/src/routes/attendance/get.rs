use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use services::check_in::CheckInService;
use services::correction::CorrectionService;

use super::common::{AttendanceRecordResponse, CorrectionResponse};
use crate::{response::ApiResponse, state::AppState};

/// GET /attendance/{attendance_id}
pub async fn get_record(
    State(state): State<AppState>,
    Path(attendance_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    match CheckInService::get(state.db(), attendance_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(record.into(), "Attendance record retrieved")),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// GET /attendance/{attendance_id}/corrections
///
/// Newest correction first.
pub async fn list_corrections(
    State(state): State<AppState>,
    Path(attendance_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<CorrectionResponse>>>) {
    match CorrectionService::history(state.db(), attendance_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(Into::into).collect(),
                "Corrections retrieved",
            )),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}

/// GET /attendance/event/{event_id}
///
/// All records for an event ordered by check-in time.
pub async fn list_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> (StatusCode, Json<ApiResponse<Vec<AttendanceRecordResponse>>>) {
    match CheckInService::list_for_event(state.db(), &event_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(Into::into).collect(),
                "Attendance records retrieved",
            )),
        ),
        Err(e) => ApiResponse::from_error(e),
    }
}
