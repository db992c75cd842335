//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `classline_core` linkage.
//! - Seed an in-memory database and print summary counts for quick local
//!   sanity checks.

use classline_core::db::open_db_in_memory;
use classline_core::db::seed::seed_sample_data;
use classline_core::{
    NotificationRepository, SqliteNotificationRepository, SqliteStudentRepository,
    StudentRepository,
};

fn main() {
    println!("classline_core ping={}", classline_core::ping());
    println!("classline_core version={}", classline_core::core_version());

    if let Err(err) = run_seed_probe() {
        eprintln!("seed probe failed: {err}");
        std::process::exit(1);
    }
}

fn run_seed_probe() -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    seed_sample_data(&conn)?;

    let students = SqliteStudentRepository::try_new(&conn)?;
    let notifications = SqliteNotificationRepository::try_new(&conn)?;
    println!(
        "seeded students={} notifications={}",
        students.count_students()?,
        notifications.count_all()?
    );
    Ok(())
}
