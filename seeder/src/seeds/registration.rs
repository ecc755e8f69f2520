use crate::seed::Seeder;
use crate::seeds::center::FIXED_CENTERS;
use db::models::registration::{Model, ParticipationMode};
use sea_orm::DatabaseConnection;

pub struct RegistrationSeeder;

const EVENTS: [&str; 3] = ["evt-2025-summit", "evt-2025-retreat", "evt-2025-assembly"];
const PER_EVENT: usize = 60;

#[async_trait::async_trait]
impl Seeder for RegistrationSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        for (e, event_id) in EVENTS.iter().enumerate() {
            for n in 1..=PER_EVENT {
                let id = format!("reg-{e}-{n:03}");
                let member_id = format!("member-{:05}", fastrand::u32(..100_000));

                let mode = match fastrand::u8(..10) {
                    0..=3 => ParticipationMode::Onsite,
                    4..=5 => ParticipationMode::Hybrid,
                    _ => ParticipationMode::Online,
                };

                // Only in-person registrations get a venue.
                let center_id = mode
                    .is_in_person()
                    .then(|| FIXED_CENTERS[fastrand::usize(..FIXED_CENTERS.len())].0);

                let _ = Model::create(db, &id, event_id, &member_id, center_id, Some(mode)).await;
            }
        }
    }
}
