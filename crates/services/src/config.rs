use std::env;
use std::time::Duration as StdDuration;

use chrono::Duration;
use riddle_core::difficulty::TierPolicy;
use riddle_core::model::TotalLevels;
use riddle_core::progression::ProgressionSettings;

use crate::error::ConfigError;

pub const ENV_TOTAL_LEVELS: &str = "RIDDLE_TOTAL_LEVELS";
pub const ENV_FLASH_MS: &str = "RIDDLE_FLASH_MS";
pub const ENV_RETRY_LIMIT: &str = "RIDDLE_RETRY_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "RIDDLE_TIMEOUT_SECS";
pub const ENV_SHUFFLE_CHOICES: &str = "RIDDLE_SHUFFLE_CHOICES";
pub const ENV_TIER_MEDIUM_PERCENT: &str = "RIDDLE_TIER_MEDIUM_PERCENT";
pub const ENV_TIER_HARD_PERCENT: &str = "RIDDLE_TIER_HARD_PERCENT";

/// Game tunables. Defaults match a ten level game with a one second flash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub total_levels: TotalLevels,
    pub flash_ms: u64,
    pub retry_limit: u32,
    pub request_timeout_secs: u64,
    pub shuffle_choices: bool,
    pub tiers: TierPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_levels: TotalLevels::default(),
            flash_ms: 1_000,
            retry_limit: 2,
            request_timeout_secs: 20,
            shuffle_choices: true,
            tiers: TierPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Read overrides from `RIDDLE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`GameConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let total_levels = match read_number(&lookup, ENV_TOTAL_LEVELS)? {
            Some(levels) => {
                let levels = u32::try_from(levels).map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_TOTAL_LEVELS,
                    raw: levels.to_string(),
                })?;
                TotalLevels::new(levels).ok_or(ConfigError::ZeroLevels)?
            }
            None => defaults.total_levels,
        };

        let medium = read_u32(&lookup, ENV_TIER_MEDIUM_PERCENT)?
            .unwrap_or(defaults.tiers.medium_percent());
        let hard = read_u32(&lookup, ENV_TIER_HARD_PERCENT)?
            .unwrap_or(defaults.tiers.hard_percent());

        Ok(Self {
            total_levels,
            flash_ms: read_number(&lookup, ENV_FLASH_MS)?.unwrap_or(defaults.flash_ms),
            retry_limit: read_u32(&lookup, ENV_RETRY_LIMIT)?.unwrap_or(defaults.retry_limit),
            request_timeout_secs: read_number(&lookup, ENV_TIMEOUT_SECS)?
                .unwrap_or(defaults.request_timeout_secs),
            shuffle_choices: read_bool(&lookup, ENV_SHUFFLE_CHOICES)?
                .unwrap_or(defaults.shuffle_choices),
            tiers: TierPolicy::new(medium, hard)?,
        })
    }

    #[must_use]
    pub fn with_total_levels(mut self, total_levels: TotalLevels) -> Self {
        self.total_levels = total_levels;
        self
    }

    #[must_use]
    pub fn with_shuffle_choices(mut self, shuffle_choices: bool) -> Self {
        self.shuffle_choices = shuffle_choices;
        self
    }

    #[must_use]
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn flash_window(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.flash_ms).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn progression_settings(&self) -> ProgressionSettings {
        ProgressionSettings {
            retry_limit: self.retry_limit,
            flash_window: self.flash_window(),
        }
    }
}

fn read_number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, raw })
}

fn read_u32(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u32>, ConfigError> {
    match read_number(lookup, var)? {
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                raw: value.to_string(),
            }),
        None => Ok(None),
    }
}

fn read_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { var, raw }),
    }
}
