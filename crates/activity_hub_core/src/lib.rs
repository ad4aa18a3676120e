//! Core domain logic for the activity registration dashboard.
//! This crate is the single source of truth for registration invariants
//! and dashboard statistics.

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use bootstrap::{seed_defaults, SeedReport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::activity::{
    parse_date_input, Activity, ActivityId, ActivityValidationError, CreateActivityRequest,
};
pub use model::registration::Registration;
pub use model::user::{Role, User, UserId};
pub use service::registration_service::{
    EngineError, EngineResult, RegistrationService, UNKNOWN_PARTICIPANT,
};
pub use service::session_service::{AuthError, SessionService};
pub use service::statistics_service::{
    AdminStatistics, FlatRateScoring, ScoringStrategy, StatisticsService, StudentStatistics,
};
pub use store::{
    Dataset, MemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, StoreKey,
    StoreResult, StoreWrite, WriteBatch,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
