//! Shared value types: hazard classes, risk levels, facility types, and the
//! caller-owned incident snapshot.

pub mod collections;
pub mod facility;
pub mod hazard;
pub mod risk;
pub mod snapshot;

pub use facility::FacilityType;
pub use hazard::HazardClass;
pub use risk::{RiskAssessment, RiskLevel, RiskTier};
pub use snapshot::{is_present, is_truthy, IncidentSnapshot, SpatialSummary};
