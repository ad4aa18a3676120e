//! Engine configuration.
//!
//! # Responsibility
//! - Hold tunables for scoring, statistics windows and activity defaults.
//! - Parse TOML overrides on top of built-in defaults.
//!
//! # Invariants
//! - `upcoming_window_days` is at least 1.
//! - Unknown keys are rejected rather than ignored.

use crate::clock::MILLIS_PER_DAY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_POINTS_PER_REGISTRATION: u64 = 10;
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/400/200";

#[derive(Debug)]
pub enum ConfigError {
    Parse(toml::de::Error),
    InvalidValue {
        field: &'static str,
        message: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid engine config: {err}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid engine config value `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunables shared by the registration and statistics services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Points awarded per registration by the flat-rate scoring strategy.
    pub points_per_registration: u64,
    /// Admin "upcoming events" horizon, in days after now.
    pub upcoming_window_days: u32,
    /// Base URL used when an activity is created without an image.
    /// An empty value leaves such activities without an image.
    pub placeholder_image_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            points_per_registration: DEFAULT_POINTS_PER_REGISTRATION,
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses TOML, filling omitted keys with defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upcoming_window_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upcoming_window_days",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Returns the placeholder base URL, `None` when disabled.
    pub fn placeholder_image_base(&self) -> Option<&str> {
        let trimmed = self.placeholder_image_url.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn upcoming_window_ms(&self) -> i64 {
        i64::from(self.upcoming_window_days) * MILLIS_PER_DAY
    }
}
