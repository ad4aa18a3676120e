//! Default data seeding for fresh stores.
//!
//! # Invariants
//! - Only absent keys are seeded; an existing key (even an empty list) is kept.
//! - All seeded keys are written in one batch.

use crate::clock::to_epoch_ms;
use crate::model::activity::Activity;
use crate::model::registration::Registration;
use crate::model::user::{Role, User};
use crate::store::{contains_key, RecordStore, StoreKey, StoreResult, WriteBatch};
use log::info;
use time::macros::datetime;

/// Keys written by one `seed_defaults` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<StoreKey>,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        self.seeded.is_empty()
    }
}

/// Seeds default users, activities and registrations where missing.
pub fn seed_defaults<S: RecordStore + ?Sized>(store: &S) -> StoreResult<SeedReport> {
    let mut batch = WriteBatch::new();
    let mut report = SeedReport::default();

    if !contains_key(store, StoreKey::Users)? {
        batch = batch.put_records(StoreKey::Users, &default_users())?;
        report.seeded.push(StoreKey::Users);
    }
    if !contains_key(store, StoreKey::Activities)? {
        batch = batch.put_records(StoreKey::Activities, &default_activities())?;
        report.seeded.push(StoreKey::Activities);
    }
    if !contains_key(store, StoreKey::Registrations)? {
        batch = batch.put_records(StoreKey::Registrations, &default_registrations())?;
        report.seeded.push(StoreKey::Registrations);
    }

    batch.commit(store)?;
    info!(
        "event=seed_defaults module=bootstrap status=ok seeded_keys={}",
        report.seeded.len()
    );
    Ok(report)
}

pub fn default_users() -> Vec<User> {
    vec![
        User::new("admin", "admin", "123", Role::Admin),
        User::new("s1", "student1", "123", Role::Student),
        User::new("s2", "student2", "123", Role::Student),
    ]
}

pub fn default_activities() -> Vec<Activity> {
    vec![
        seed_activity(
            "a1",
            "Chess Club",
            "Weekly chess meetings to challenge your mind and strategic skills. All levels welcome!",
            None,
            11,
        ),
        seed_activity(
            "a2",
            "Art Workshop",
            "Explore various art forms, from painting to sculpture. Unleash your creativity!",
            Some(to_epoch_ms(datetime!(2025-11-20 14:00 UTC))),
            28,
        ),
        seed_activity(
            "a3",
            "Basketball Tryouts",
            "Show your skills and try out for the university basketball team. Bring your A-game!",
            Some(to_epoch_ms(datetime!(2025-11-22 17:00 UTC))),
            173,
        ),
        seed_activity(
            "a4",
            "Robotics Challenge",
            "Design, build, and program your own robots for exciting challenges!",
            Some(to_epoch_ms(datetime!(2025-12-05 10:00 UTC))),
            83,
        ),
        seed_activity(
            "a5",
            "Debate Society",
            "Join the weekly debates and sharpen your public speaking and critical thinking skills.",
            Some(to_epoch_ms(datetime!(2025-11-28 18:30 UTC))),
            40,
        ),
    ]
}

pub fn default_registrations() -> Vec<Registration> {
    vec![
        Registration::new("s1", "a1"),
        Registration::new("s1", "a3"),
        Registration::new("s2", "a2"),
        Registration::new("s2", "a1"),
    ]
}

fn seed_activity(
    id: &str,
    name: &str,
    description: &str,
    date: Option<i64>,
    image_id: u32,
) -> Activity {
    let mut activity = Activity::with_id(id, name, description);
    activity.date = date;
    activity.image_url = Some(format!("https://picsum.photos/id/{image_id}/400/200"));
    activity
}
