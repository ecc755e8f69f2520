//! Error taxonomy shared by every attendance operation.

use sea_orm::{DbErr, SqlErr};

/// Result type for attendance engine operations
pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Errors surfaced by the attendance engine.
///
/// `NotFound` and `Validation` carry a caller-facing message. `Database` wraps
/// anything the store rejected for reasons other than business rules.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AttendanceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// True when the store refused a write because a unique index already holds the value.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
