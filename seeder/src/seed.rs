use async_trait::async_trait;
use colored::*;
use futures::FutureExt;
use sea_orm::DatabaseConnection;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

#[async_trait]
pub trait Seeder {
    async fn seed(&self, db: &DatabaseConnection);
}

/// Runs one seeder, printing a dotted status line. Exits the process if it panics.
pub async fn run_seeder<S: Seeder + ?Sized>(seeder: &S, name: &str, db: &DatabaseConnection) {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    if std::panic::AssertUnwindSafe(seeder.seed(db))
        .catch_unwind()
        .await
        .is_err()
    {
        println!("{}", "failed".red());
        std::process::exit(1);
    }

    let time_str = format!("({:.2?})", start.elapsed()).dimmed();
    println!("{} {}", "done".green(), time_str);
}
