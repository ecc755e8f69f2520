use axum::{Json, http::StatusCode};
use serde::Serialize;
use services::error::AttendanceError;

/// Envelope for every JSON response.
///
/// ```json
/// {
///   "success": true,
///   "data": { "id": 7, "registrationId": "reg-1", "checkInMethod": "KIOSK" },
///   "message": "Check-in recorded"
/// }
/// ```
///
/// On failure `success` is `false`, `data` is the payload type's default and
/// `message` says what went wrong.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }

    /// Maps an engine error to its HTTP status and envelope.
    ///
    /// `NotFound` → 404, `Validation` → 400, `Database` → 500.
    pub fn from_error(err: AttendanceError) -> (StatusCode, Json<Self>)
    where
        T: Default,
    {
        let status = match &err {
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(Self::error(err.to_string())))
    }
}

/// Empty payload for error-only responses.
#[derive(Serialize, Default)]
pub struct Empty;
