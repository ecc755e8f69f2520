//! Registration lookup and venue checks.
//!
//! Registrations and centers belong to other services. Everything here is
//! read-only and runs before any attendance row is touched.

use crate::error::{AttendanceError, AttendanceResult};
use db::models::{
    attendance_record::Model as AttendanceRecord,
    center::Entity as CenterEntity,
    registration::{Entity as RegistrationEntity, Model as Registration},
};
use sea_orm::{DatabaseConnection, EntityTrait};

pub struct RegistrationLookup;

impl RegistrationLookup {
    pub async fn resolve(
        db: &DatabaseConnection,
        registration_id: &str,
    ) -> AttendanceResult<Registration> {
        RegistrationEntity::find_by_id(registration_id.to_owned())
            .one(db)
            .await?
            .ok_or_else(|| {
                AttendanceError::not_found(format!("Registration {registration_id} not found"))
            })
    }

    /// Resolves a registration and checks that it belongs to `event_id`.
    pub async fn resolve_for_event(
        db: &DatabaseConnection,
        registration_id: &str,
        event_id: &str,
    ) -> AttendanceResult<Registration> {
        let registration = Self::resolve(db, registration_id).await?;

        if registration.event_id != event_id {
            return Err(AttendanceError::validation(format!(
                "Registration {registration_id} does not belong to event {event_id}"
            )));
        }

        Ok(registration)
    }

    /// Decides which center a check-in is recorded against.
    ///
    /// For in-person modes a requested center must exist and, when the
    /// registration already has an assigned center, match it. Without a request
    /// the assigned center is used. Capacity is then checked against the event's
    /// existing check-ins at that center; the count is read without a lock, so
    /// concurrent check-ins can overshoot it slightly.
    pub async fn resolve_center(
        db: &DatabaseConnection,
        registration: &Registration,
        requested: Option<&str>,
    ) -> AttendanceResult<Option<String>> {
        let mode = registration.effective_mode();

        if let (true, Some(center_id)) = (mode.is_in_person(), requested) {
            if CenterEntity::find_by_id(center_id.to_owned())
                .one(db)
                .await?
                .is_none()
            {
                return Err(AttendanceError::not_found(format!(
                    "Center {center_id} not found"
                )));
            }

            if let Some(assigned) = registration.center_id.as_deref() {
                if assigned != center_id {
                    return Err(AttendanceError::validation(format!(
                        "Center mismatch: registration is assigned to {assigned}, not {center_id}"
                    )));
                }
            }
        }

        let center_id = requested
            .map(str::to_owned)
            .or_else(|| registration.center_id.clone());

        if let Some(center_id) = center_id.as_deref() {
            Self::ensure_capacity(db, &registration.event_id, center_id).await?;
        }

        Ok(center_id)
    }

    async fn ensure_capacity(
        db: &DatabaseConnection,
        event_id: &str,
        center_id: &str,
    ) -> AttendanceResult<()> {
        let Some(center) = CenterEntity::find_by_id(center_id.to_owned()).one(db).await? else {
            return Ok(());
        };
        let Some(capacity) = center.capacity else {
            return Ok(());
        };

        let taken = AttendanceRecord::count_at_center(db, event_id, center_id).await?;
        if taken >= u64::try_from(capacity.max(0)).unwrap_or(0) {
            return Err(AttendanceError::validation(format!(
                "Center capacity exceeded for {center_id}"
            )));
        }

        Ok(())
    }
}
