//! Conflict resolution for a registration that missed the idempotency cache.
//!
//! The first write for a registration always wins. Every later attempt is
//! classified against that first record and never changes its `check_in_time`,
//! which is what lets replays converge regardless of delivery order.

use chrono::{DateTime, Utc};
use db::models::attendance_record::{CheckInMethod, Model as AttendanceRecord};

/// The parts of an incoming check-in that decide how it relates to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingCheckIn {
    pub check_in_time: DateTime<Utc>,
    pub check_in_method: CheckInMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No record yet; the caller may create one.
    ProceedToWrite,
    /// A different check-in already exists for the registration.
    Conflict(i64),
    /// The existing record is this very check-in, delivered again.
    Duplicate(i64),
}

/// Classifies `incoming` against the registration's existing record, if any.
///
/// A record with the same check-in instant and method is treated as a resend
/// whose idempotency entry has expired or was never written.
pub fn resolve(existing: Option<&AttendanceRecord>, incoming: &IncomingCheckIn) -> Resolution {
    match existing {
        None => Resolution::ProceedToWrite,
        Some(record)
            if record.check_in_time == incoming.check_in_time
                && record.check_in_method == incoming.check_in_method =>
        {
            Resolution::Duplicate(record.id)
        }
        Some(record) => Resolution::Conflict(record.id),
    }
}
