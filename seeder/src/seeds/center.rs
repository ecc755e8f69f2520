use crate::seed::Seeder;
use db::models::center::Model;
use fake::{Fake, faker::address::en::CityName};
use sea_orm::DatabaseConnection;

pub struct CenterSeeder;

/// Centers every dev database has, so kiosks can be pointed at known ids.
pub const FIXED_CENTERS: [(&str, &str, Option<i32>); 3] = [
    ("c-north", "North Hall", Some(200)),
    ("c-south", "South Hall", Some(150)),
    ("c-overflow", "Overflow Tent", None),
];

#[async_trait::async_trait]
impl Seeder for CenterSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        for (id, name, capacity) in FIXED_CENTERS {
            let _ = Model::create(db, id, name, capacity).await;
        }

        for i in 1..=5 {
            let city: String = CityName().fake();
            let capacity = Some(fastrand::i32(20..120));
            let _ = Model::create(db, &format!("c-{i:02}"), &format!("{city} Center"), capacity)
                .await;
        }
    }
}
