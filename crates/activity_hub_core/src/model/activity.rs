//! Activity domain model.
//!
//! # Responsibility
//! - Define the activity record and its creation request.
//! - Parse dashboard form input into typed fields.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused.
//! - `name` is non-blank after trimming.
//! - Activities are never mutated in place; they are created or deleted.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use time::macros::format_description;
use time::PrimitiveDateTime;
use uuid::Uuid;

/// Stable activity identifier.
pub type ActivityId = String;

/// Validation errors for activity creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// Date input is neither empty nor `YYYY-MM-DDTHH:MM[:SS]`.
    InvalidDate(String),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "activity name must not be blank"),
            Self::InvalidDate(value) => write!(f, "invalid activity date `{value}`"),
        }
    }
}

impl Error for ActivityValidationError {}

/// Activity record stored under the `activities` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub description: String,
    /// Unix epoch milliseconds (UTC). `None` for ongoing activities.
    ///
    /// Also reads the dashboard's raw form value: `""` or `YYYY-MM-DDTHH:MM[:SS]`.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Activity {
    /// Builds an activity with a freshly generated random id.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, description)
    }

    /// Builds an activity with a caller-provided id.
    ///
    /// Used by seeding, where ids are fixed.
    pub fn with_id(
        id: impl Into<ActivityId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            date: None,
            image_url: None,
        }
    }

    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.name.trim().is_empty() {
            return Err(ActivityValidationError::BlankName);
        }
        Ok(())
    }

    /// Returns whether the activity is dated strictly after `now_ms`.
    pub fn starts_after(&self, now_ms: i64) -> bool {
        self.date.is_some_and(|date| date > now_ms)
    }
}

/// Input for creating one activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateActivityRequest {
    pub name: String,
    pub description: String,
    /// Epoch milliseconds.
    pub date: Option<i64>,
    pub image_url: Option<String>,
}

impl CreateActivityRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date_ms: i64) -> Self {
        self.date = Some(date_ms);
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Builds a request from raw form fields.
    ///
    /// Empty `date` and `image_url` inputs mean "not set". Dates use the
    /// `datetime-local` layout and are interpreted as UTC.
    pub fn from_form(
        name: &str,
        description: &str,
        date: &str,
        image_url: &str,
    ) -> Result<Self, ActivityValidationError> {
        let image_url = image_url.trim();
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            date: parse_date_input(date)?,
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        })
    }
}

/// Parses `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS` into epoch milliseconds.
///
/// Blank input returns `Ok(None)`.
pub fn parse_date_input(value: &str) -> Result<Option<i64>, ActivityValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .map_err(|_| ActivityValidationError::InvalidDate(trimmed.to_string()))?;

    let utc = parsed.assume_utc();
    Ok(Some(utc.unix_timestamp() * 1000 + i64::from(utc.millisecond())))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDate {
    EpochMs(i64),
    FormValue(String),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StoredDate>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StoredDate::EpochMs(ms)) => Ok(Some(ms)),
        Some(StoredDate::FormValue(value)) => {
            parse_date_input(&value).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date_input, Activity, ActivityValidationError, CreateActivityRequest};

    #[test]
    fn validate_rejects_blank_name() {
        let activity = Activity::new("   ", "desc");
        assert_eq!(activity.validate(), Err(ActivityValidationError::BlankName));
    }

    #[test]
    fn new_generates_distinct_ids() {
        let first = Activity::new("Chess", "");
        let second = Activity::new("Chess", "");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn parse_date_input_accepts_datetime_local_layouts() {
        assert_eq!(parse_date_input("").unwrap(), None);
        assert_eq!(
            parse_date_input("1970-01-01T00:01").unwrap(),
            Some(60_000)
        );
        assert_eq!(
            parse_date_input("1970-01-01T00:00:30").unwrap(),
            Some(30_000)
        );
    }

    #[test]
    fn parse_date_input_rejects_garbage() {
        let err = parse_date_input("next tuesday").unwrap_err();
        assert_eq!(
            err,
            ActivityValidationError::InvalidDate("next tuesday".to_string())
        );
    }

    #[test]
    fn from_form_treats_empty_fields_as_absent() {
        let request = CreateActivityRequest::from_form("Chess Club", "weekly", "", "  ").unwrap();
        assert_eq!(request.date, None);
        assert_eq!(request.image_url, None);
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let activity: Activity =
            serde_json::from_str(r#"{"id":"a1","name":"Chess","description":""}"#).unwrap();
        assert_eq!(activity.date, None);
        assert_eq!(activity.image_url, None);
    }

    #[test]
    fn date_reads_epoch_ms_null_and_form_strings() {
        let activities: Vec<Activity> = serde_json::from_str(
            r#"[
                {"id":"a1","name":"Party","description":"","date":""},
                {"id":"a2","name":"Workshop","description":"","date":"2025-11-20T14:00"},
                {"id":"a3","name":"Talk","description":"","date":1763647200000},
                {"id":"a4","name":"Run","description":"","date":null}
            ]"#,
        )
        .unwrap();

        let dates = activities.iter().map(|a| a.date).collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![None, Some(1_763_647_200_000), Some(1_763_647_200_000), None]
        );
    }

    #[test]
    fn date_is_written_back_as_epoch_ms() {
        let activity: Activity = serde_json::from_str(
            r#"{"id":"a2","name":"Workshop","description":"","date":"2025-11-20T14:00"}"#,
        )
        .unwrap();
        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["date"], serde_json::json!(1_763_647_200_000_i64));
    }

    #[test]
    fn unparsable_date_string_rejects_the_record() {
        let result = serde_json::from_str::<Activity>(
            r#"{"id":"a1","name":"Party","description":"","date":"soon"}"#,
        );
        assert!(result.is_err());
    }
}
