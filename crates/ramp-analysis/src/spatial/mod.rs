//! Spatial impact: isolation zones and position impact analysis over the
//! airfield topology.

pub mod analyzer;
pub mod propagator;
pub mod rules;
pub mod types;

pub use analyzer::PositionImpactAnalyzer;
pub use propagator::SpatialPropagator;
pub use rules::{isolation_rule, IsolationRule, FALLBACK_RULE};
pub use types::{
    AdjacentImpact, EfficiencyImpact, EfficiencyLevel, FacilityPartition, ImpactZone,
    PositionImpact, ZoneStatus,
};
