//! Airfield topology configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOPOLOGY_PATH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TopologyConfig {
    /// Path to the airfield graph JSON. Default: `config/topology/airfield.json`.
    pub graph_path: Option<String>,
}

impl TopologyConfig {
    pub fn effective_graph_path(&self) -> PathBuf {
        PathBuf::from(self.graph_path.as_deref().unwrap_or(DEFAULT_TOPOLOGY_PATH))
    }
}
