//! Startup errors aggregated across subsystems.

use super::error_code::RampErrorCode;
use super::{ConfigError, ConstraintError, TopologyError};

/// Everything that can stop the runtime from initializing.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Constraint error: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Runtime already initialized")]
    AlreadyInitialized,
}

impl RampErrorCode for InitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Constraint(e) => e.error_code(),
            Self::Topology(e) => e.error_code(),
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
        }
    }
}
