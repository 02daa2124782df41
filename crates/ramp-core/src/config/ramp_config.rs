//! Top-level configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ComplianceConfig, ConstraintsConfig, TopologyConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`RAMP_*`)
/// 2. Project config (`ramp.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RampConfig {
    pub constraints: ConstraintsConfig,
    pub topology: TopologyConfig,
    pub compliance: ComplianceConfig,
}

impl RampConfig {
    /// Load configuration for a project root.
    ///
    /// A missing `ramp.toml` is not an error; a malformed one is.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        // Relative paths are resolved against the project root.
        config.constraints.scenarios_dir = Some(
            root.join(config.constraints.effective_scenarios_dir())
                .display()
                .to_string(),
        );
        config.topology.graph_path = Some(
            root.join(config.topology.effective_graph_path())
                .display()
                .to_string(),
        );

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RampConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &RampConfig) -> Result<(), ConfigError> {
        if let Some(ref dir) = config.constraints.scenarios_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "constraints.scenarios_dir".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(ref path) = config.topology.graph_path {
            if path.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "topology.graph_path".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        let c = &config.compliance;
        let medium = c.effective_medium_score_threshold();
        let high = c.effective_high_score_threshold();
        let critical = c.effective_critical_score_threshold();
        if medium < 0.0 || !(medium <= high && high <= critical) {
            return Err(ConfigError::ValidationFailed {
                field: "compliance.*_score_threshold".to_string(),
                message: format!(
                    "thresholds must satisfy 0 <= medium <= high <= critical (got {medium}, {high}, {critical})"
                ),
            });
        }
        if let Some(ref action) = c.fire_notification_action {
            if action.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "compliance.fire_notification_action".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut RampConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: RampConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base` wherever `other` has a `Some` value.
    fn merge(base: &mut RampConfig, other: &RampConfig) {
        if other.constraints.scenarios_dir.is_some() {
            base.constraints.scenarios_dir = other.constraints.scenarios_dir.clone();
        }
        if other.constraints.preload.is_some() {
            base.constraints.preload = other.constraints.preload;
        }

        if other.topology.graph_path.is_some() {
            base.topology.graph_path = other.topology.graph_path.clone();
        }

        if other.compliance.fire_notification_action.is_some() {
            base.compliance.fire_notification_action =
                other.compliance.fire_notification_action.clone();
        }
        if other.compliance.medium_score_threshold.is_some() {
            base.compliance.medium_score_threshold = other.compliance.medium_score_threshold;
        }
        if other.compliance.high_score_threshold.is_some() {
            base.compliance.high_score_threshold = other.compliance.high_score_threshold;
        }
        if other.compliance.critical_score_threshold.is_some() {
            base.compliance.critical_score_threshold = other.compliance.critical_score_threshold;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `RAMP_SCENARIOS_DIR`, `RAMP_TOPOLOGY_PATH`, etc.
    fn apply_env_overrides(config: &mut RampConfig) {
        if let Ok(val) = std::env::var("RAMP_SCENARIOS_DIR") {
            config.constraints.scenarios_dir = Some(val);
        }
        if let Ok(val) = std::env::var("RAMP_PRELOAD_SCENARIOS") {
            if let Ok(v) = val.parse::<bool>() {
                config.constraints.preload = Some(v);
            }
        }
        if let Ok(val) = std::env::var("RAMP_TOPOLOGY_PATH") {
            config.topology.graph_path = Some(val);
        }
        if let Ok(val) = std::env::var("RAMP_FIRE_NOTIFICATION_ACTION") {
            config.compliance.fire_notification_action = Some(val);
        }
        if let Ok(val) = std::env::var("RAMP_HIGH_SCORE_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.compliance.high_score_threshold = Some(v);
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
