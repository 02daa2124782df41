//! SpatialPropagator: isolation zones by BFS from the incident anchor.

use std::sync::Arc;

use ramp_core::tracing::fields;
use ramp_core::types::{FacilityType, HazardClass, RiskTier};
use tracing::field::Empty;
use tracing::{debug, instrument};

use super::rules::isolation_rule;
use super::types::{FacilityPartition, ImpactZone, ZoneStatus};
use crate::topology::TopologyGraph;

pub struct SpatialPropagator {
    graph: Arc<TopologyGraph>,
}

impl SpatialPropagator {
    pub fn new(graph: Arc<TopologyGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// Isolation zone around `anchor_text`. An unresolvable location gives a
    /// `LocationNotFound` zone with no nodes; a missing tier uses the
    /// fallback rule.
    #[instrument(
        skip(self),
        fields(anchor_node = Empty, hop_radius = Empty, isolated_count = Empty)
    )]
    pub fn calculate_impact_zone(
        &self,
        anchor_text: &str,
        hazard: HazardClass,
        risk: Option<RiskTier>,
    ) -> ImpactZone {
        let (rule, used_fallback_rule) = isolation_rule(hazard, risk);
        let span = tracing::Span::current();
        span.record(fields::HOP_RADIUS, rule.radius);

        let mut zone = ImpactZone {
            status: ZoneStatus::LocationNotFound,
            query: anchor_text.to_string(),
            anchor_node: None,
            anchor_type: None,
            hazard,
            risk_tier: risk,
            radius: rule.radius,
            may_affect_runway: rule.may_affect_runway,
            used_fallback_rule,
            isolated_nodes: Default::default(),
            affected: FacilityPartition::default(),
            levels: Vec::new(),
            transitive_runways: Vec::new(),
        };

        let Some(anchor) = self.graph.find_nearest_node(anchor_text, None) else {
            debug!(query = anchor_text, "anchor location not found");
            return zone;
        };
        let Some(anchor_type) = self.graph.get_node(&anchor).map(|n| n.facility) else {
            return zone;
        };
        span.record(fields::ANCHOR_NODE, anchor.as_str());

        zone.levels = self.graph.bfs_spread_levels(&anchor, rule.radius);
        zone.isolated_nodes = zone.levels.iter().flatten().cloned().collect();
        zone.affected = self.partition(zone.isolated_nodes.iter());

        if rule.may_affect_runway && zone.affected.runways.is_empty() {
            let mut extra: Vec<String> = Vec::new();
            for taxiway in &zone.affected.taxiways {
                for neighbor in self.graph.get_adjacent_nodes(taxiway) {
                    let is_runway = self
                        .graph
                        .get_node(neighbor)
                        .is_some_and(|n| n.facility == FacilityType::Runway);
                    if is_runway && !extra.iter().any(|r| r == neighbor) {
                        extra.push(neighbor.to_string());
                    }
                }
            }
            extra.sort();
            for runway in &extra {
                zone.isolated_nodes.insert(runway.clone());
                zone.affected.runways.push(runway.clone());
            }
            zone.transitive_runways = extra;
        }

        span.record(fields::ISOLATED_COUNT, zone.isolated_nodes.len());
        zone.status = ZoneStatus::Resolved;
        zone.anchor_type = Some(anchor_type);
        zone.anchor_node = Some(anchor);
        zone
    }

    pub(crate) fn partition<'a>(&self, ids: impl Iterator<Item = &'a String>) -> FacilityPartition {
        let mut out = FacilityPartition::default();
        for id in ids {
            if let Some(node) = self.graph.get_node(id) {
                out.push(node.facility, id.clone());
            }
        }
        out.sort();
        out
    }
}
