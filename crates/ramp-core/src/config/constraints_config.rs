//! Scenario constraint store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SCENARIOS_DIR;

/// Where scenario checklists and stage files live.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConstraintsConfig {
    /// Directory with one sub-directory per scenario. Default: `config/scenarios`.
    pub scenarios_dir: Option<String>,
    /// Load every scenario at startup instead of lazily. Default: false.
    pub preload: Option<bool>,
}

impl ConstraintsConfig {
    /// Returns the effective scenarios directory.
    pub fn effective_scenarios_dir(&self) -> PathBuf {
        PathBuf::from(self.scenarios_dir.as_deref().unwrap_or(DEFAULT_SCENARIOS_DIR))
    }

    pub fn effective_preload(&self) -> bool {
        self.preload.unwrap_or(false)
    }
}
