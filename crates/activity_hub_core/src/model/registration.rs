//! Registration domain model.

use crate::model::activity::ActivityId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Enrollment of one user in one activity.
///
/// Equality is the composite `(user_id, activity_id)` identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_id: UserId,
    pub activity_id: ActivityId,
}

impl Registration {
    pub fn new(user_id: impl Into<UserId>, activity_id: impl Into<ActivityId>) -> Self {
        Self {
            user_id: user_id.into(),
            activity_id: activity_id.into(),
        }
    }

    /// Returns whether this registration is the given pair.
    pub fn is_pair(&self, user_id: &str, activity_id: &str) -> bool {
        self.user_id == user_id && self.activity_id == activity_id
    }
}

#[cfg(test)]
mod tests {
    use super::Registration;

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(Registration::new("s1", "a1")).unwrap();
        assert_eq!(value["userId"], "s1");
        assert_eq!(value["activityId"], "a1");
    }
}
