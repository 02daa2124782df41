//! Impact zone and position impact results. Plain data, serde-serializable.

use std::collections::BTreeSet;

use ramp_core::types::{FacilityType, HazardClass, RiskLevel, RiskTier, SpatialSummary};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    Resolved,
    LocationNotFound,
}

/// Node ids split by facility type, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacilityPartition {
    pub stands: Vec<String>,
    pub taxiways: Vec<String>,
    pub runways: Vec<String>,
}

impl FacilityPartition {
    pub fn push(&mut self, facility: FacilityType, id: String) {
        match facility {
            FacilityType::Stand => self.stands.push(id),
            FacilityType::Taxiway => self.taxiways.push(id),
            FacilityType::Runway => self.runways.push(id),
        }
    }

    pub fn get(&self, facility: FacilityType) -> &[String] {
        match facility {
            FacilityType::Stand => &self.stands,
            FacilityType::Taxiway => &self.taxiways,
            FacilityType::Runway => &self.runways,
        }
    }

    pub fn len(&self) -> usize {
        self.stands.len() + self.taxiways.len() + self.runways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn sort(&mut self) {
        self.stands.sort();
        self.taxiways.sort();
        self.runways.sort();
    }
}

/// Which facilities must be isolated around an incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactZone {
    pub status: ZoneStatus,
    /// The location text as given.
    pub query: String,
    pub anchor_node: Option<String>,
    pub anchor_type: Option<FacilityType>,
    pub hazard: HazardClass,
    pub risk_tier: Option<RiskTier>,
    /// Hop radius actually applied.
    pub radius: u32,
    pub may_affect_runway: bool,
    /// The table had no row for (hazard, tier); FUEL/MEDIUM was used.
    pub used_fallback_rule: bool,
    /// Anchor included.
    pub isolated_nodes: BTreeSet<String>,
    pub affected: FacilityPartition,
    /// BFS levels; `levels[0]` is the anchor.
    pub levels: Vec<Vec<String>>,
    /// Runways added because an affected taxiway touches them.
    pub transitive_runways: Vec<String>,
}

impl ImpactZone {
    pub fn is_resolved(&self) -> bool {
        self.status == ZoneStatus::Resolved
    }

    pub fn isolated_count(&self) -> usize {
        self.isolated_nodes.len()
    }

    pub fn runway_affected(&self) -> bool {
        !self.affected.runways.is_empty()
    }

    pub fn runway_added_transitively(&self) -> bool {
        !self.transitive_runways.is_empty()
    }

    /// The part a snapshot keeps for the compliance layer.
    pub fn to_summary(&self) -> SpatialSummary {
        let mut extra = Map::new();
        extra.insert("radius".to_string(), Value::from(self.radius));
        extra.insert("hazard".to_string(), Value::from(self.hazard.name()));
        extra.insert("runway_affected".to_string(), Value::Bool(self.runway_affected()));
        SpatialSummary {
            anchor_node: self.anchor_node.clone(),
            isolated_nodes: self.isolated_nodes.iter().cloned().collect(),
            extra,
        }
    }
}

/// Facilities reached by the secondary walk.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdjacentImpact {
    pub radius: u32,
    /// Excludes the anchor.
    pub affected: FacilityPartition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyLevel {
    /// Single-runway airfield loses its runway.
    Stoppage,
    /// One of several runways is lost.
    Partial,
    Moderate,
    Minor,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyImpact {
    pub level: EfficiencyLevel,
    /// Estimated share of movement capacity lost, 0-100.
    pub capacity_loss_pct: f64,
    pub runway_count: usize,
    pub description: String,
}

/// Facility-specific impact report for one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionImpact {
    pub status: ZoneStatus,
    pub query: String,
    pub anchor_node: Option<String>,
    pub anchor_type: Option<FacilityType>,
    pub hazard: HazardClass,
    pub risk_level: RiskLevel,
    pub closure_minutes: u32,
    /// 0-10, one decimal.
    pub severity: f64,
    pub description: String,
    pub adjacent: AdjacentImpact,
    pub efficiency: EfficiencyImpact,
    pub recommendations: Vec<String>,
}

impl PositionImpact {
    pub fn is_resolved(&self) -> bool {
        self.status == ZoneStatus::Resolved
    }
}
