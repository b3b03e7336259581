//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use riddle_core::difficulty::TierPolicyError;
use riddle_core::model::RiddleError;

/// Errors emitted by a `RiddleGenerator` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("riddle generator is not configured")]
    Disabled,
    #[error("riddle generator returned an empty response")]
    EmptyResponse,
    #[error("riddle generator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("riddle generator returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Single failure outcome of `RiddleSource::fetch`.
///
/// Cloneable so one upstream failure can be handed to every caller waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationFailure {
    #[error("riddle generator is not configured")]
    Disabled,
    #[error("riddle generator failed: {0}")]
    Upstream(String),
    #[error("riddle generator returned an invalid riddle: {0}")]
    Malformed(#[from] RiddleError),
    #[error("riddle generator timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("riddle request was abandoned before it finished")]
    Abandoned,
}

impl From<GeneratorError> for GenerationFailure {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Disabled => Self::Disabled,
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// Errors emitted while reading game configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {raw:?}")]
    InvalidNumber { var: &'static str, raw: String },
    #[error("{var} must be true or false, got {raw:?}")]
    InvalidBool { var: &'static str, raw: String },
    #[error("total levels must be at least 1")]
    ZeroLevels,
    #[error(transparent)]
    Tiers(#[from] TierPolicyError),
}
