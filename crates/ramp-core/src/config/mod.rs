//! Configuration system.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod compliance_config;
pub mod constraints_config;
pub mod ramp_config;
pub mod topology_config;

pub use compliance_config::ComplianceConfig;
pub use constraints_config::ConstraintsConfig;
pub use ramp_config::RampConfig;
pub use topology_config::TopologyConfig;
