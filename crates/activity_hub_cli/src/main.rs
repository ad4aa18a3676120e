//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `activity_hub_core` linkage and store bootstrap end to end.
//! - Print both dashboards' statistics for the seeded data set.
//!
//! Usage: `activity_hub_cli [db_path]` (in-memory store when omitted).
//! Set `ACTIVITY_HUB_LOG_DIR` to an absolute path to enable file logging at
//! the build's default level.

use activity_hub_core::db::{open_db, open_db_in_memory};
use activity_hub_core::store::load_records;
use activity_hub_core::{
    init_logging, seed_defaults, LogLevel, SqliteRecordStore, StatisticsService, StoreKey,
    SystemClock, User,
};
use std::error::Error;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "ACTIVITY_HUB_LOG_DIR";

fn main() -> ExitCode {
    println!("activity_hub_core ping={}", activity_hub_core::ping());
    println!("activity_hub_core version={}", activity_hub_core::core_version());

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: Option<String>) -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        let level = LogLevel::build_default();
        init_logging(level.as_str(), &log_dir)?;
        println!("logging level={} dir={log_dir}", level.as_str());
    }

    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = SqliteRecordStore::try_new(&conn)?;

    let report = seed_defaults(&store)?;
    println!("seeded_keys={}", report.seeded.len());

    let stats = StatisticsService::new(&store, SystemClock);
    let admin = stats.admin_statistics();
    println!(
        "admin total_activities={} total_students={} active_students={} participation_rate={}% upcoming_events={}",
        admin.total_activities,
        admin.total_students,
        admin.active_students,
        admin.participation_rate,
        admin.upcoming_events
    );

    let users: Vec<User> = load_records(&store, StoreKey::Users);
    for user in users.iter().filter(|user| user.is_student()) {
        let mine = stats.student_statistics(&user.id);
        println!(
            "student {} registered={} upcoming={} participation={}% points={}",
            user.username,
            mine.my_registered_count,
            mine.my_upcoming_count,
            mine.my_participation_rate,
            mine.total_points
        );
    }
    Ok(())
}
