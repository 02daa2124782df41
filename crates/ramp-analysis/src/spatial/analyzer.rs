//! PositionImpactAnalyzer: closure time, severity, adjacent impact, and
//! capacity loss for the facility at the incident position.

use std::sync::Arc;

use ramp_core::types::{FacilityType, HazardClass, RiskLevel};
use tracing::{debug, instrument};

use super::rules::{
    adjacent_radius, base_closure_minutes, recommendations, risk_multiplier, severity_score,
};
use super::types::{
    AdjacentImpact, EfficiencyImpact, EfficiencyLevel, FacilityPartition, ImpactZone,
    PositionImpact, ZoneStatus,
};
use crate::topology::TopologyGraph;

/// Capacity lost when a taxiway closes.
const TAXIWAY_LOSS_PCT: f64 = 25.0;
/// Capacity lost when a stand closes.
const STAND_LOSS_PCT: f64 = 5.0;

pub struct PositionImpactAnalyzer {
    graph: Arc<TopologyGraph>,
}

impl PositionImpactAnalyzer {
    pub fn new(graph: Arc<TopologyGraph>) -> Self {
        Self { graph }
    }

    /// Analyze the facility `anchor_text` resolves to. Unknown risk is
    /// treated as MEDIUM.
    #[instrument(skip(self))]
    pub fn analyze(
        &self,
        anchor_text: &str,
        hazard: HazardClass,
        risk: Option<RiskLevel>,
    ) -> PositionImpact {
        let risk = risk.unwrap_or(RiskLevel::Medium);
        match self.graph.find_nearest_node(anchor_text, None) {
            Some(anchor) => self.analyze_anchor(anchor_text, &anchor, hazard, risk),
            None => {
                debug!(query = anchor_text, "position not found");
                not_found(anchor_text, hazard, risk)
            }
        }
    }

    /// Analyze using the anchor of an already computed zone.
    pub fn analyze_zone(
        &self,
        zone: &ImpactZone,
        hazard: HazardClass,
        risk: Option<RiskLevel>,
    ) -> PositionImpact {
        let risk = risk.unwrap_or(RiskLevel::Medium);
        match zone.anchor_node.as_deref() {
            Some(anchor) if zone.is_resolved() => {
                self.analyze_anchor(&zone.query, anchor, hazard, risk)
            }
            _ => not_found(&zone.query, hazard, risk),
        }
    }

    fn analyze_anchor(
        &self,
        query: &str,
        anchor: &str,
        hazard: HazardClass,
        risk: RiskLevel,
    ) -> PositionImpact {
        let Some(facility) = self.graph.get_node(anchor).map(|n| n.facility) else {
            return not_found(query, hazard, risk);
        };

        let closure_minutes =
            (f64::from(base_closure_minutes(hazard, facility)) * risk_multiplier(risk)).round() as u32;
        let severity = severity_score(facility, hazard, risk);
        let adjacent = self.adjacent_impact(anchor, facility, hazard);
        let efficiency = self.efficiency(facility, &adjacent);

        let description = format!(
            "{hazard} incident at {facility} {anchor}: estimated closure {closure_minutes} min, \
             severity {severity:.1}/10, {} adjacent facilities affected",
            adjacent.affected.len()
        );

        PositionImpact {
            status: ZoneStatus::Resolved,
            query: query.to_string(),
            anchor_node: Some(anchor.to_string()),
            anchor_type: Some(facility),
            hazard,
            risk_level: risk,
            closure_minutes,
            severity,
            description,
            adjacent,
            efficiency,
            recommendations: recommendations(facility, hazard, risk, anchor),
        }
    }

    fn adjacent_impact(
        &self,
        anchor: &str,
        facility: FacilityType,
        hazard: HazardClass,
    ) -> AdjacentImpact {
        let radius = adjacent_radius(facility, hazard);
        let mut affected = FacilityPartition::default();
        for id in self.graph.bfs_spread(anchor, radius) {
            if id == anchor {
                continue;
            }
            if let Some(node) = self.graph.get_node(&id) {
                affected.push(node.facility, id);
            }
        }
        affected.sort();
        AdjacentImpact { radius, affected }
    }

    fn efficiency(&self, facility: FacilityType, adjacent: &AdjacentImpact) -> EfficiencyImpact {
        let runway_count = self.graph.runway_count();
        let touches_runway = facility == FacilityType::Runway || !adjacent.affected.runways.is_empty();

        let (level, loss, description) = if touches_runway && runway_count <= 1 {
            (
                EfficiencyLevel::Stoppage,
                100.0,
                "Single-runway airfield: movements stop until the runway reopens".to_string(),
            )
        } else if touches_runway {
            let loss = 100.0 / runway_count as f64;
            (
                EfficiencyLevel::Partial,
                loss,
                format!("One of {runway_count} runways affected: about {loss:.0}% capacity lost"),
            )
        } else if facility == FacilityType::Taxiway {
            (
                EfficiencyLevel::Moderate,
                TAXIWAY_LOSS_PCT,
                "Taxiway closure: rerouting slows ground movements".to_string(),
            )
        } else {
            (
                EfficiencyLevel::Minor,
                STAND_LOSS_PCT,
                "Stand closure: flights are reassigned to other stands".to_string(),
            )
        };

        EfficiencyImpact {
            level,
            capacity_loss_pct: (loss * 10.0_f64).round() / 10.0,
            runway_count,
            description,
        }
    }
}

fn not_found(query: &str, hazard: HazardClass, risk: RiskLevel) -> PositionImpact {
    PositionImpact {
        status: ZoneStatus::LocationNotFound,
        query: query.to_string(),
        anchor_node: None,
        anchor_type: None,
        hazard,
        risk_level: risk,
        closure_minutes: 0,
        severity: 0.0,
        description: format!("Location '{query}' not found in the airfield topology"),
        adjacent: AdjacentImpact::default(),
        efficiency: EfficiencyImpact {
            level: EfficiencyLevel::Unknown,
            capacity_loss_pct: 0.0,
            runway_count: 0,
            description: "Unknown: location not resolved".to_string(),
        },
        recommendations: vec!["Confirm the exact stand, taxiway, or runway designator".to_string()],
    }
}
