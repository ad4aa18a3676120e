use activity_hub_core::clock::MILLIS_PER_DAY;
use activity_hub_core::store::save_records;
use activity_hub_core::{
    seed_defaults, Activity, AdminStatistics, EngineConfig, FixedClock, MemoryRecordStore,
    Registration, RegistrationService, Role, ScoringStrategy, StatisticsService,
    StudentStatistics, StoreKey, User,
};

const NOW: i64 = 1_800_000_000_000;

fn dated(id: &str, date: Option<i64>) -> Activity {
    let mut activity = Activity::with_id(id, format!("Activity {id}"), "");
    activity.date = date;
    activity
}

#[test]
fn seeded_admin_dashboard_scenario() {
    let store = MemoryRecordStore::new();
    seed_defaults(&store).unwrap();
    let stats = StatisticsService::new(&store, FixedClock(NOW));

    let admin = stats.admin_statistics();

    assert_eq!(admin.total_activities, 5);
    assert_eq!(admin.total_students, 2);
    assert_eq!(admin.active_students, 2);
    assert_eq!(admin.participation_rate, 100);
}

#[test]
fn student_with_one_future_registration_scenario() {
    let store = MemoryRecordStore::new();
    save_records(
        &store,
        StoreKey::Users,
        &[User::new("s1", "student1", "123", Role::Student)],
    )
    .unwrap();
    save_records(
        &store,
        StoreKey::Activities,
        &[
            dated("past", Some(NOW - MILLIS_PER_DAY)),
            dated("future", Some(NOW + MILLIS_PER_DAY)),
            dated("other", None),
            dated("unused", None),
        ],
    )
    .unwrap();
    save_records(
        &store,
        StoreKey::Registrations,
        &[
            Registration::new("s1", "past"),
            Registration::new("s1", "future"),
        ],
    )
    .unwrap();
    let stats = StatisticsService::new(&store, FixedClock(NOW));

    let mine = stats.student_statistics("s1");

    assert_eq!(
        mine,
        StudentStatistics {
            my_registered_count: 2,
            my_upcoming_count: 1,
            total_points: 20,
            my_participation_rate: 50,
        }
    );
}

#[test]
fn empty_store_yields_zero_rates() {
    let store = MemoryRecordStore::new();
    let stats = StatisticsService::new(&store, FixedClock(NOW));

    assert_eq!(
        stats.admin_statistics(),
        AdminStatistics {
            total_activities: 0,
            total_students: 0,
            active_students: 0,
            participation_rate: 0,
            upcoming_events: 0,
        }
    );
    assert_eq!(stats.student_statistics("s1").my_participation_rate, 0);
}

#[test]
fn zero_students_with_registrations_keeps_rate_at_zero() {
    let store = MemoryRecordStore::new();
    save_records(&store, StoreKey::Registrations, &[Registration::new("x", "a1")]).unwrap();
    let stats = StatisticsService::new(&store, FixedClock(NOW));

    let admin = stats.admin_statistics();

    assert_eq!(admin.active_students, 1);
    assert_eq!(admin.participation_rate, 0);
}

#[test]
fn active_students_ignore_role() {
    let store = MemoryRecordStore::new();
    seed_defaults(&store).unwrap();
    let engine = RegistrationService::new(&store);
    engine.unregister_user("s2", "a1").unwrap();
    engine.unregister_user("s2", "a2").unwrap();
    engine.register_user("admin", "a4").unwrap();
    let stats = StatisticsService::new(&store, FixedClock(NOW));

    let admin = stats.admin_statistics();

    assert_eq!(admin.total_students, 2);
    assert_eq!(admin.active_students, 2);
    assert_eq!(admin.participation_rate, 100);
}

#[test]
fn upcoming_window_excludes_now_and_includes_day_thirty() {
    let store = MemoryRecordStore::new();
    let window = 30 * MILLIS_PER_DAY;
    save_records(
        &store,
        StoreKey::Activities,
        &[
            dated("now", Some(NOW)),
            dated("soon", Some(NOW + 1)),
            dated("edge", Some(NOW + window)),
            dated("beyond", Some(NOW + window + 1)),
            dated("undated", None),
        ],
    )
    .unwrap();
    save_records(
        &store,
        StoreKey::Registrations,
        &[
            Registration::new("s1", "now"),
            Registration::new("s1", "soon"),
            Registration::new("s1", "edge"),
            Registration::new("s1", "beyond"),
            Registration::new("s1", "undated"),
            Registration::new("s1", "deleted-activity"),
        ],
    )
    .unwrap();
    let stats = StatisticsService::new(&store, FixedClock(NOW));

    assert_eq!(stats.admin_statistics().upcoming_events, 2);

    let mine = stats.student_statistics("s1");
    assert_eq!(mine.my_upcoming_count, 3);
    assert_eq!(mine.my_registered_count, 6);
    assert_eq!(mine.my_participation_rate, 120);
}

#[test]
fn configured_window_and_points_are_applied() {
    let store = MemoryRecordStore::new();
    save_records(
        &store,
        StoreKey::Activities,
        &[
            dated("tomorrow", Some(NOW + MILLIS_PER_DAY)),
            dated("next-month", Some(NOW + 20 * MILLIS_PER_DAY)),
        ],
    )
    .unwrap();
    save_records(&store, StoreKey::Registrations, &[Registration::new("s1", "tomorrow")]).unwrap();
    let config = EngineConfig::from_toml_str(
        "points_per_registration = 15\nupcoming_window_days = 7\n",
    )
    .unwrap();
    let stats = StatisticsService::with_config(&store, FixedClock(NOW), &config);

    assert_eq!(stats.admin_statistics().upcoming_events, 1);
    assert_eq!(stats.student_statistics("s1").total_points, 15);
}

struct DatedActivityBonus;

impl ScoringStrategy for DatedActivityBonus {
    fn score(&self, registrations: &[&Registration], activities: &[Activity]) -> u64 {
        registrations
            .iter()
            .map(|registration| {
                let dated = activities
                    .iter()
                    .any(|activity| activity.id == registration.activity_id && activity.date.is_some());
                if dated {
                    25
                } else {
                    5
                }
            })
            .sum()
    }
}

#[test]
fn custom_scoring_strategy_replaces_flat_rate() {
    let store = MemoryRecordStore::new();
    seed_defaults(&store).unwrap();
    let stats = StatisticsService::new(&store, FixedClock(NOW)).with_scoring(DatedActivityBonus);

    assert_eq!(stats.student_statistics("s1").total_points, 30);
}

#[test]
fn statistics_reflect_latest_writes() {
    let store = MemoryRecordStore::new();
    seed_defaults(&store).unwrap();
    let engine = RegistrationService::new(&store);
    let stats = StatisticsService::new(&store, FixedClock(NOW));
    assert_eq!(stats.student_statistics("s1").my_registered_count, 2);

    engine.register_user("s1", "a5").unwrap();
    assert_eq!(stats.student_statistics("s1").my_registered_count, 3);
    assert_eq!(stats.student_statistics("s1").my_participation_rate, 60);

    engine.delete_activity("a1").unwrap();
    let admin = stats.admin_statistics();
    assert_eq!(admin.total_activities, 4);
    assert_eq!(stats.student_statistics("s1").my_registered_count, 2);
    assert_eq!(stats.student_statistics("s1").my_participation_rate, 50);
}
