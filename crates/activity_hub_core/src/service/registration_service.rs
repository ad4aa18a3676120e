//! Activity and registration consistency engine.
//!
//! # Responsibility
//! - Create and delete activities, register and unregister users.
//! - Serve the activity listings the dashboards render.
//!
//! # Invariants
//! - At most one registration exists per `(user_id, activity_id)` pair.
//! - New registrations reference an existing user and activity.
//! - Deleting an activity removes its registrations in the same write batch.
//! - Deleting or unregistering an absent target is a silent no-op.
//! - Commands load strictly: a collection that cannot be read or parsed
//!   aborts the command before anything is written.

use crate::config::EngineConfig;
use crate::model::activity::{
    Activity, ActivityId, ActivityValidationError, CreateActivityRequest,
};
use crate::model::registration::Registration;
use crate::model::user::{User, UserId};
use crate::store::{
    load_records, save_records, try_load_records, RecordStore, StoreError, StoreKey, WriteBatch,
};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display name used for registrations whose user no longer exists.
pub const UNKNOWN_PARTICIPANT: &str = "Unknown";

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by engine commands.
#[derive(Debug)]
pub enum EngineError {
    /// Activity input failed validation.
    InvalidActivity(ActivityValidationError),
    /// The pair is already registered.
    DuplicateRegistration {
        user_id: UserId,
        activity_id: ActivityId,
    },
    /// Registration target user does not exist.
    UserNotFound(UserId),
    /// Registration target activity does not exist.
    ActivityNotFound(ActivityId),
    /// A collection could not be loaded or a write could not be persisted;
    /// state is unchanged.
    StorageUnavailable(StoreError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidActivity(err) => write!(f, "{err}"),
            Self::DuplicateRegistration {
                user_id,
                activity_id,
            } => write!(
                f,
                "user {user_id} is already registered for activity {activity_id}"
            ),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::ActivityNotFound(id) => write!(f, "activity not found: {id}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidActivity(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for EngineError {
    fn from(value: ActivityValidationError) -> Self {
        Self::InvalidActivity(value)
    }
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        Self::StorageUnavailable(value)
    }
}

/// Consistency engine over one record store.
pub struct RegistrationService<S: RecordStore> {
    store: S,
    config: EngineConfig,
}

impl<S: RecordStore> RegistrationService<S> {
    /// Creates the engine with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Creates and persists a new activity.
    ///
    /// # Contract
    /// - The id is a fresh random UUID.
    /// - `name` is trimmed and must not be blank.
    /// - Without an image, a placeholder URL is derived from config when enabled.
    pub fn create_activity(&self, request: &CreateActivityRequest) -> EngineResult<Activity> {
        let mut activity = Activity::new(request.name.trim(), request.description.as_str());
        activity.validate()?;
        let image_url = request
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.config
                    .placeholder_image_base()
                    .map(|base| format!("{base}?random={}", activity.id))
            });
        activity.date = request.date;
        activity.image_url = image_url;

        let mut activities: Vec<Activity> = try_load_records(&self.store, StoreKey::Activities)?;
        activities.push(activity.clone());
        save_records(&self.store, StoreKey::Activities, &activities)?;

        info!(
            "event=activity_create module=engine status=ok activity_id={} dated={}",
            activity.id,
            activity.date.is_some()
        );
        Ok(activity)
    }

    /// Deletes one activity and cascades to its registrations.
    ///
    /// Both collections are written in one batch; nothing is written when
    /// the activity and its registrations are already gone.
    pub fn delete_activity(&self, activity_id: &str) -> EngineResult<()> {
        let mut activities: Vec<Activity> = try_load_records(&self.store, StoreKey::Activities)?;
        let mut registrations: Vec<Registration> =
            try_load_records(&self.store, StoreKey::Registrations)?;

        let activities_before = activities.len();
        let registrations_before = registrations.len();
        activities.retain(|activity| activity.id != activity_id);
        registrations.retain(|registration| registration.activity_id != activity_id);

        let removed_activities = activities_before - activities.len();
        let removed_registrations = registrations_before - registrations.len();
        if removed_activities == 0 && removed_registrations == 0 {
            debug!("event=activity_delete module=engine status=noop activity_id={activity_id}");
            return Ok(());
        }

        WriteBatch::new()
            .put_records(StoreKey::Activities, &activities)?
            .put_records(StoreKey::Registrations, &registrations)?
            .commit(&self.store)?;

        info!(
            "event=activity_delete module=engine status=ok activity_id={activity_id} removed_activities={removed_activities} removed_registrations={removed_registrations}"
        );
        Ok(())
    }

    /// Registers a user for an activity.
    ///
    /// # Errors
    /// - `DuplicateRegistration` when the pair already exists.
    /// - `UserNotFound` / `ActivityNotFound` for dangling references.
    /// - `StorageUnavailable` when a collection cannot be read or the write fails.
    pub fn register_user(&self, user_id: &str, activity_id: &str) -> EngineResult<Registration> {
        let mut registrations: Vec<Registration> =
            try_load_records(&self.store, StoreKey::Registrations)?;
        if registrations
            .iter()
            .any(|registration| registration.is_pair(user_id, activity_id))
        {
            warn!(
                "event=registration_create module=engine status=error error_code=duplicate user_id={user_id} activity_id={activity_id}"
            );
            return Err(EngineError::DuplicateRegistration {
                user_id: user_id.to_string(),
                activity_id: activity_id.to_string(),
            });
        }

        let users: Vec<User> = try_load_records(&self.store, StoreKey::Users)?;
        if !users.iter().any(|user| user.id == user_id) {
            return Err(EngineError::UserNotFound(user_id.to_string()));
        }
        let activities: Vec<Activity> = try_load_records(&self.store, StoreKey::Activities)?;
        if !activities.iter().any(|activity| activity.id == activity_id) {
            return Err(EngineError::ActivityNotFound(activity_id.to_string()));
        }

        let registration = Registration::new(user_id, activity_id);
        registrations.push(registration.clone());
        save_records(&self.store, StoreKey::Registrations, &registrations)?;

        info!(
            "event=registration_create module=engine status=ok user_id={user_id} activity_id={activity_id}"
        );
        Ok(registration)
    }

    /// Removes the registration for one pair, if present.
    pub fn unregister_user(&self, user_id: &str, activity_id: &str) -> EngineResult<()> {
        let mut registrations: Vec<Registration> =
            try_load_records(&self.store, StoreKey::Registrations)?;
        let before = registrations.len();
        registrations.retain(|registration| !registration.is_pair(user_id, activity_id));
        if registrations.len() == before {
            debug!(
                "event=registration_delete module=engine status=noop user_id={user_id} activity_id={activity_id}"
            );
            return Ok(());
        }

        save_records(&self.store, StoreKey::Registrations, &registrations)?;
        info!(
            "event=registration_delete module=engine status=ok user_id={user_id} activity_id={activity_id}"
        );
        Ok(())
    }

    /// Lists all activities in creation order.
    pub fn list_activities(&self) -> Vec<Activity> {
        load_records(&self.store, StoreKey::Activities)
    }

    pub fn get_activity(&self, activity_id: &str) -> Option<Activity> {
        self.list_activities()
            .into_iter()
            .find(|activity| activity.id == activity_id)
    }

    pub fn registrations_for_user(&self, user_id: &str) -> Vec<Registration> {
        let registrations: Vec<Registration> = load_records(&self.store, StoreKey::Registrations);
        registrations
            .into_iter()
            .filter(|registration| registration.user_id == user_id)
            .collect()
    }

    /// Activities the user is registered for, in activity order.
    pub fn activities_for_user(&self, user_id: &str) -> Vec<Activity> {
        let registrations = self.registrations_for_user(user_id);
        self.list_activities()
            .into_iter()
            .filter(|activity| {
                registrations
                    .iter()
                    .any(|registration| registration.activity_id == activity.id)
            })
            .collect()
    }

    pub fn is_registered(&self, user_id: &str, activity_id: &str) -> bool {
        self.registrations_for_user(user_id)
            .iter()
            .any(|registration| registration.activity_id == activity_id)
    }

    /// Usernames registered for one activity, in registration order.
    ///
    /// Registrations whose user is missing are reported as `Unknown`.
    pub fn participants(&self, activity_id: &str) -> Vec<String> {
        let users: Vec<User> = load_records(&self.store, StoreKey::Users);
        let registrations: Vec<Registration> = load_records(&self.store, StoreKey::Registrations);
        registrations
            .iter()
            .filter(|registration| registration.activity_id == activity_id)
            .map(|registration| {
                users
                    .iter()
                    .find(|user| user.id == registration.user_id)
                    .map_or_else(
                        || UNKNOWN_PARTICIPANT.to_string(),
                        |user| user.username.clone(),
                    )
            })
            .collect()
    }
}
