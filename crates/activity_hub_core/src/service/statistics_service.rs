//! Dashboard statistics.
//!
//! # Responsibility
//! - Derive admin-wide and per-student metrics from the stored collections.
//!
//! # Invariants
//! - Every query reloads the store; nothing is cached between calls.
//! - Percentages are integers rounded half-up and are `0` when the
//!   denominator is empty.
//! - `active_students` counts distinct registering user ids regardless of role.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::model::activity::Activity;
use crate::model::registration::Registration;
use crate::model::user::Role;
use crate::store::{Dataset, RecordStore};
use serde::Serialize;
use std::collections::HashSet;

/// Platform-wide metrics for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatistics {
    pub total_activities: usize,
    pub total_students: usize,
    pub active_students: usize,
    /// Whole percent, without the `%` suffix.
    pub participation_rate: u32,
    pub upcoming_events: usize,
}

/// Personal metrics for the student dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatistics {
    pub my_registered_count: usize,
    pub my_upcoming_count: usize,
    pub total_points: u64,
    /// Whole percent, without the `%` suffix.
    pub my_participation_rate: u32,
}

/// Reward scheme turning a student's registrations into points.
pub trait ScoringStrategy {
    fn score(&self, registrations: &[&Registration], activities: &[Activity]) -> u64;
}

/// Fixed number of points per registration, saturating at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRateScoring {
    pub points_per_registration: u64,
}

impl ScoringStrategy for FlatRateScoring {
    fn score(&self, registrations: &[&Registration], _activities: &[Activity]) -> u64 {
        (registrations.len() as u64).saturating_mul(self.points_per_registration)
    }
}

/// Computes admin metrics over a snapshot.
///
/// Upcoming events are dated in `(now_ms, now_ms + window_ms]`.
pub fn admin_statistics(dataset: &Dataset, now_ms: i64, window_ms: i64) -> AdminStatistics {
    let total_students = dataset
        .users
        .iter()
        .filter(|user| user.role == Role::Student)
        .count();
    let active_students = dataset
        .registrations
        .iter()
        .map(|registration| registration.user_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let window_end = now_ms.saturating_add(window_ms);
    let upcoming_events = dataset
        .activities
        .iter()
        .filter_map(|activity| activity.date)
        .filter(|date| *date > now_ms && *date <= window_end)
        .count();

    AdminStatistics {
        total_activities: dataset.activities.len(),
        total_students,
        active_students,
        participation_rate: percentage(active_students, total_students),
        upcoming_events,
    }
}

/// Computes one student's metrics over a snapshot.
///
/// Upcoming registrations have an existing, dated activity after `now_ms`,
/// with no upper bound.
pub fn student_statistics(
    dataset: &Dataset,
    user_id: &str,
    now_ms: i64,
    scoring: &dyn ScoringStrategy,
) -> StudentStatistics {
    let mine = dataset.registrations_of(user_id).collect::<Vec<_>>();
    let my_upcoming_count = mine
        .iter()
        .filter(|registration| {
            dataset
                .activity(&registration.activity_id)
                .is_some_and(|activity| activity.starts_after(now_ms))
        })
        .count();

    StudentStatistics {
        my_registered_count: mine.len(),
        my_upcoming_count,
        total_points: scoring.score(&mine, &dataset.activities),
        my_participation_rate: percentage(mine.len(), dataset.activities.len()),
    }
}

/// `part / whole` as a whole percent rounded half-up; `0` when `whole == 0`.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u64;
    let whole = whole as u64;
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Statistics queries bound to a store and a clock.
pub struct StatisticsService<S: RecordStore, C: Clock> {
    store: S,
    clock: C,
    scoring: Box<dyn ScoringStrategy>,
    upcoming_window_ms: i64,
}

impl<S: RecordStore, C: Clock> StatisticsService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, &EngineConfig::default())
    }

    pub fn with_config(store: S, clock: C, config: &EngineConfig) -> Self {
        Self {
            store,
            clock,
            scoring: Box::new(FlatRateScoring {
                points_per_registration: config.points_per_registration,
            }),
            upcoming_window_ms: config.upcoming_window_ms(),
        }
    }

    /// Replaces the scoring strategy.
    pub fn with_scoring(mut self, scoring: impl ScoringStrategy + 'static) -> Self {
        self.scoring = Box::new(scoring);
        self
    }

    pub fn admin_statistics(&self) -> AdminStatistics {
        let dataset = Dataset::load(&self.store);
        admin_statistics(&dataset, self.clock.now_epoch_ms(), self.upcoming_window_ms)
    }

    pub fn student_statistics(&self, user_id: &str) -> StudentStatistics {
        let dataset = Dataset::load(&self.store);
        student_statistics(
            &dataset,
            user_id,
            self.clock.now_epoch_ms(),
            self.scoring.as_ref(),
        )
    }
}
