//! Verification and spatial-impact layer for airport ramp incidents.
//!
//! - [`constraints`]: per-scenario field/action/stage requirements, loaded once.
//! - [`topology`]: the airfield graph, location resolution, BFS.
//! - [`compliance`]: lifecycle stage inference, transitions, validation.
//! - [`spatial`]: isolation-zone propagation and position impact analysis.
//! - [`runtime`]: process-wide singletons wired at startup.

pub mod compliance;
pub mod constraints;
pub mod runtime;
pub mod spatial;
pub mod topology;

pub use compliance::{ComplianceEngine, ComplianceValidator, LifecycleStage, ValidationResult};
pub use constraints::{ConstraintStore, ScenarioConstraints};
pub use runtime::{ImpactReport, RampRuntime, RuntimeOptions};
pub use spatial::{ImpactZone, PositionImpact, PositionImpactAnalyzer, SpatialPropagator};
pub use topology::{TopologyGraph, TopologyStore};
