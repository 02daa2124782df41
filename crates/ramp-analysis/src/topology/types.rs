//! Airfield graph node/edge types and the on-disk document shape.

use std::collections::BTreeMap;

use ramp_core::types::FacilityType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stand, taxiway segment, or runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: String,
    #[serde(rename = "type")]
    pub facility: FacilityType,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Anything else the file carried for this node (name, length, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl TopologyNode {
    /// The part of the id after `<type>_`, e.g. `501` for `stand_501`.
    pub fn suffix(&self) -> &str {
        self.id
            .split_once('_')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.id)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}

/// Undirected connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TopologyEdge {
    /// Metres.
    pub distance: f64,
    /// How often aircraft use this connection (traffic weight).
    pub usage_count: u32,
}

/// `{"nodes": {id: {...}}, "edges": [...]}` as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: BTreeMap<String, RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub usage_count: Option<u32>,
}
