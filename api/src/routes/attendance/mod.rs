//! `/attendance` routes.
//!
//! Every route here sits behind `allow_authenticated`; handlers read the
//! caller from the `AuthUser` extension.

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod common;
mod get;
mod post;

pub use common::{
    AttendanceCodeResponse, AttendanceRecordResponse, BulkSyncResponse, CorrectionResponse,
};
pub use get::{get_record, list_corrections, list_for_event};
pub use post::{bulk_sync, check_in, check_out, correct, generate_code, validate_code, verify};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(check_in))
        .route("/check-out", post(check_out))
        .route("/bulk-sync", post(bulk_sync))
        .route("/code/generate", post(generate_code))
        .route("/code/validate", post(validate_code))
        .route("/event/{event_id}", get(list_for_event))
        .route("/{attendance_id}", get(get_record))
        .route("/{attendance_id}/corrections", get(list_corrections))
        .route("/{attendance_id}/correct", post(correct))
        .route("/{attendance_id}/verify", post(verify))
}
