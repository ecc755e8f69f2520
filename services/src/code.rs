//! Attendance code engine.
//!
//! Issues short-lived, single-use QR/SAC codes and redeems them. Redemption is a
//! single conditional update, so two concurrent attempts on one code can never
//! both succeed.

use chrono::{Duration, Utc};
use db::models::attendance_code::{CodeType, Model as AttendanceCode};
use db::models::attendance_record::CheckInMethod;
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{debug, info};

use crate::error::{AttendanceError, AttendanceResult, is_unique_violation};

/// Uppercase alphanumerics minus the look-alikes `0 O 1 I`.
const SAC_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const MAX_GENERATE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct CodeOptions {
    /// How long a freshly issued code stays redeemable.
    pub validity: Duration,
    pub sac_length: usize,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            validity: Duration::hours(24),
            sac_length: 6,
        }
    }
}

pub struct CodeService;

impl CodeService {
    /// Issues a new random code for `event_id`.
    pub async fn generate(
        db: &DatabaseConnection,
        event_id: &str,
        code_type: CodeType,
        options: CodeOptions,
    ) -> AttendanceResult<AttendanceCode> {
        let expires_at = Utc::now() + options.validity;

        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = random_code(code_type, options.sac_length);

            match AttendanceCode::create(db, &code, code_type, event_id, expires_at).await {
                Ok(created) => {
                    info!(event_id, code_type = %code_type, code_id = created.id, "Attendance code issued");
                    return Ok(created);
                }
                Err(e) if is_unique_violation(&e) => {
                    debug!(attempt, "Attendance code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AttendanceError::validation(
            "Could not generate a unique attendance code",
        ))
    }

    /// Redeems `code`, marking it used.
    ///
    /// Fails with `NotFound` for an unknown code and `Validation` when the code
    /// is already used or past its expiry.
    pub async fn validate<C: ConnectionTrait>(db: &C, code: &str) -> AttendanceResult<AttendanceCode> {
        let code = code.trim();
        let now = Utc::now();

        if AttendanceCode::redeem(db, code, now).await? {
            return AttendanceCode::find_by_code(db, code)
                .await?
                .ok_or_else(|| AttendanceError::not_found("Attendance code not found"));
        }

        match AttendanceCode::find_by_code(db, code).await? {
            None => Err(AttendanceError::not_found("Attendance code not found")),
            Some(found) if found.is_used => {
                Err(AttendanceError::validation("Attendance code already used"))
            }
            Some(found) if found.is_expired(now) => {
                Err(AttendanceError::validation("Attendance code expired"))
            }
            Some(_) => Err(AttendanceError::validation(
                "Attendance code could not be redeemed",
            )),
        }
    }

    /// Redeems a code presented as part of a check-in.
    ///
    /// The code must have been issued for the same event and its type must
    /// match the check-in method. Pass the check-in's transaction so the code
    /// stays unspent if the record insert fails.
    pub async fn redeem_for_check_in<C: ConnectionTrait>(
        db: &C,
        code: &str,
        event_id: &str,
        method: CheckInMethod,
    ) -> AttendanceResult<AttendanceCode> {
        let found = AttendanceCode::find_by_code(db, code.trim())
            .await?
            .ok_or_else(|| AttendanceError::not_found("Attendance code not found"))?;

        if found.event_id != event_id {
            return Err(AttendanceError::validation(
                "Attendance code was issued for a different event",
            ));
        }

        let expected = match method {
            CheckInMethod::Qr => CodeType::Qr,
            CheckInMethod::Sac => CodeType::Sac,
            other => {
                return Err(AttendanceError::validation(format!(
                    "Check-in method {other} does not accept an attendance code"
                )));
            }
        };
        if found.code_type != expected {
            return Err(AttendanceError::validation(
                "Attendance code type does not match check-in method",
            ));
        }

        Self::validate(db, &found.code).await
    }
}

fn random_code(code_type: CodeType, sac_length: usize) -> String {
    let mut rng = rand::rng();

    match code_type {
        CodeType::Sac => (0..sac_length)
            .map(|_| SAC_ALPHABET[rng.random_range(0..SAC_ALPHABET.len())] as char)
            .collect(),
        CodeType::Qr => format!("{:032x}", rng.random::<u128>()),
    }
}
