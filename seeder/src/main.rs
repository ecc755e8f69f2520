use crate::seed::{Seeder, run_seeder};
use crate::seeds::{center::CenterSeeder, registration::RegistrationSeeder};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = db::connect().await;

    for (seeder, name) in [
        (Box::new(CenterSeeder) as Box<dyn Seeder + Send + Sync>, "Center"),
        (Box::new(RegistrationSeeder), "Registration"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
