//! Error handling for the ramp engine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Only load-time failures are errors. Lookup misses, illegal transitions and
//! unmet preconditions are ordinary results.

pub mod config_error;
pub mod constraint_error;
pub mod error_code;
pub mod init_error;
pub mod topology_error;

pub use config_error::ConfigError;
pub use constraint_error::ConstraintError;
pub use error_code::RampErrorCode;
pub use init_error::InitError;
pub use topology_error::TopologyError;
