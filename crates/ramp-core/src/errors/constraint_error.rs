//! Scenario constraint loading errors.

use super::error_code::{self, RampErrorCode};

/// Errors raised by the constraint store. Both are load-time only: once a
/// scenario loads, repeated lookups never fail.
#[derive(Debug, thiserror::Error)]
pub enum ConstraintError {
    #[error("Scenario config not found for '{scenario}': {path}")]
    ConfigNotFound { scenario: String, path: String },

    #[error("Scenario config invalid for '{scenario}' ({file}): {message}")]
    ConfigInvalid {
        scenario: String,
        file: String,
        message: String,
    },
}

impl ConstraintError {
    pub fn invalid(scenario: &str, file: &str, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            scenario: scenario.to_string(),
            file: file.to_string(),
            message: message.into(),
        }
    }
}

impl RampErrorCode for ConstraintError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => error_code::CONFIG_NOT_FOUND,
            Self::ConfigInvalid { .. } => error_code::CONFIG_INVALID,
        }
    }
}
