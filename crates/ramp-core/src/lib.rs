//! Core types, errors, configuration, tracing, and constants shared by the
//! ramp incident verification engine.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::RampConfig;
pub use errors::{ConfigError, ConstraintError, InitError, TopologyError};
pub use types::{FacilityType, HazardClass, IncidentSnapshot, RiskLevel, RiskTier};
