//! Static impact tables keyed by hazard class, risk, and facility type.

use ramp_core::types::{FacilityType, HazardClass, RiskLevel, RiskTier};
use serde::Serialize;

/// Isolation radius and whether the hazard may reach a runway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IsolationRule {
    pub radius: u32,
    pub may_affect_runway: bool,
}

impl IsolationRule {
    const fn new(radius: u32, may_affect_runway: bool) -> Self {
        Self {
            radius,
            may_affect_runway,
        }
    }
}

/// FUEL/MEDIUM, used for anything the table does not cover.
pub const FALLBACK_RULE: IsolationRule = IsolationRule::new(2, false);

/// Look up the isolation rule. The flag is true when the fallback row was
/// used. Rows never shrink as the tier rises.
pub fn isolation_rule(hazard: HazardClass, tier: Option<RiskTier>) -> (IsolationRule, bool) {
    let Some(tier) = tier else {
        return (FALLBACK_RULE, true);
    };
    let row = match hazard {
        HazardClass::Fuel => [(1, false), (2, false), (3, true)],
        HazardClass::Hydraulic => [(1, false), (1, false), (2, true)],
        HazardClass::Oil => [(0, false), (1, false), (2, false)],
        HazardClass::Debris => [(0, false), (1, true), (2, true)],
        HazardClass::BirdStrike => [(0, false), (1, true), (2, true)],
        HazardClass::Unknown => return (FALLBACK_RULE, true),
    };
    let (radius, runway) = match tier {
        RiskTier::Low => row[0],
        RiskTier::Medium => row[1],
        RiskTier::High => row[2],
    };
    (IsolationRule::new(radius, runway), false)
}

/// Base closure minutes before the risk multiplier.
pub fn base_closure_minutes(hazard: HazardClass, facility: FacilityType) -> u32 {
    let [stand, taxiway, runway] = match hazard {
        HazardClass::Fuel => [45, 60, 90],
        HazardClass::Hydraulic => [30, 40, 60],
        HazardClass::Oil => [20, 30, 45],
        HazardClass::Debris => [10, 15, 20],
        HazardClass::BirdStrike => [15, 20, 30],
        HazardClass::Unknown => [30, 40, 60],
    };
    match facility {
        FacilityType::Stand => stand,
        FacilityType::Taxiway => taxiway,
        FacilityType::Runway => runway,
    }
}

pub fn risk_multiplier(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 1.0,
        RiskLevel::Medium => 1.5,
        RiskLevel::High => 2.0,
        RiskLevel::Critical => 2.5,
    }
}

fn facility_weight(facility: FacilityType) -> f64 {
    match facility {
        FacilityType::Stand => 1.0,
        FacilityType::Taxiway => 2.0,
        FacilityType::Runway => 4.0,
    }
}

fn hazard_weight(hazard: HazardClass) -> f64 {
    match hazard {
        HazardClass::Fuel => 3.0,
        HazardClass::Oil => 1.5,
        HazardClass::Hydraulic
        | HazardClass::Debris
        | HazardClass::BirdStrike
        | HazardClass::Unknown => 2.0,
    }
}

fn severity_factor(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 0.8,
        RiskLevel::Medium => 1.0,
        RiskLevel::High => 1.3,
        RiskLevel::Critical => 1.6,
    }
}

/// Severity on a 0-10 scale, one decimal.
pub fn severity_score(facility: FacilityType, hazard: HazardClass, risk: RiskLevel) -> f64 {
    let raw = (facility_weight(facility) + hazard_weight(hazard)) * severity_factor(risk);
    (raw.clamp(0.0, 10.0) * 10.0).round() / 10.0
}

/// Radius of the secondary "adjacent impact" walk. Independent of the
/// isolation radius.
pub fn adjacent_radius(facility: FacilityType, hazard: HazardClass) -> u32 {
    match (facility, hazard) {
        (FacilityType::Stand, HazardClass::Fuel) => 2,
        (FacilityType::Taxiway, HazardClass::Fuel | HazardClass::Hydraulic) => 2,
        _ => 1,
    }
}

/// Canned remediation steps for the facility and hazard.
pub fn recommendations(
    facility: FacilityType,
    hazard: HazardClass,
    risk: RiskLevel,
    anchor: &str,
) -> Vec<String> {
    let mut out = vec![match facility {
        FacilityType::Stand => format!("Hold arrivals assigned to {anchor} and reassign the stand"),
        FacilityType::Taxiway => format!("Reroute taxiing traffic around {anchor}"),
        FacilityType::Runway => format!("Suspend movements on {anchor} and issue a NOTAM"),
    }];
    out.push(
        match hazard {
            HazardClass::Fuel => "Lay absorbent, keep foam on standby, remove ignition sources",
            HazardClass::Hydraulic => "Contain the hydraulic fluid and protect staff from skin contact",
            HazardClass::Oil => "Apply absorbent and sweep the contaminated surface",
            HazardClass::Debris => "Run a FOD walk and sweep the affected surface",
            HazardClass::BirdStrike => "Remove remains and notify wildlife control",
            HazardClass::Unknown => "Identify the substance before starting cleanup",
        }
        .to_string(),
    );
    if risk.is_high() {
        out.push("Keep fire and rescue on standby until the surface is verified".to_string());
    }
    if facility != FacilityType::Stand {
        out.push("Run a friction or surface inspection before reopening".to_string());
    }
    out
}
