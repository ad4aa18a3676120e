//! Typed snapshot of the three domain collections.

use super::{load_records, RecordStore, StoreKey};
use crate::model::activity::Activity;
use crate::model::registration::Registration;
use crate::model::user::User;

/// Point-in-time copy of activities, users and registrations.
///
/// Loaded fail-closed; a missing or corrupted collection is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub activities: Vec<Activity>,
    pub users: Vec<User>,
    pub registrations: Vec<Registration>,
}

impl Dataset {
    pub fn load<S: RecordStore + ?Sized>(store: &S) -> Self {
        Self {
            activities: load_records(store, StoreKey::Activities),
            users: load_records(store, StoreKey::Users),
            registrations: load_records(store, StoreKey::Registrations),
        }
    }

    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.id == activity_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    /// Registrations of one user, in stored order.
    pub fn registrations_of<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a Registration> + 'a {
        self.registrations
            .iter()
            .filter(move |registration| registration.user_id == user_id)
    }
}
