//! Tests for shared value types.

use ramp_core::config::ComplianceConfig;
use ramp_core::types::{
    is_present, is_truthy, FacilityType, HazardClass, IncidentSnapshot, RiskAssessment,
    RiskLevel, RiskTier,
};
use serde_json::json;

#[test]
fn test_hazard_parse_synonyms() {
    assert_eq!(HazardClass::parse("FUEL"), HazardClass::Fuel);
    assert_eq!(HazardClass::parse("Jet A kerosene"), HazardClass::Fuel);
    assert_eq!(HazardClass::parse("航油泄漏"), HazardClass::Fuel);
    assert_eq!(HazardClass::parse("hydraulic oil"), HazardClass::Hydraulic);
    assert_eq!(HazardClass::parse("engine oil"), HazardClass::Oil);
    assert_eq!(HazardClass::parse("FOD"), HazardClass::Debris);
    assert_eq!(HazardClass::parse("bird strike"), HazardClass::BirdStrike);
    assert_eq!(HazardClass::parse("鸟击"), HazardClass::BirdStrike);
    assert_eq!(HazardClass::parse("sand"), HazardClass::Unknown);
    assert_eq!(HazardClass::parse(""), HazardClass::Unknown);
}

#[test]
fn test_risk_level_ordering_and_tiers() {
    assert!(RiskLevel::Low < RiskLevel::Medium);
    assert!(RiskLevel::High < RiskLevel::Critical);
    assert!(RiskLevel::Critical.is_high());
    assert!(!RiskLevel::Medium.is_high());
    assert_eq!(RiskLevel::Critical.tier(), RiskTier::High);
    assert_eq!(RiskLevel::parse("R3"), Some(RiskLevel::High));
    assert_eq!(RiskLevel::parse("严重"), Some(RiskLevel::Critical));
    assert_eq!(RiskLevel::parse("sideways"), None);
    assert_eq!(RiskTier::parse("critical"), Some(RiskTier::High));
    assert_eq!(RiskTier::parse("moderate"), Some(RiskTier::Medium));
}

#[test]
fn test_risk_assessment_label_beats_score() {
    let config = ComplianceConfig::default();
    let ra = RiskAssessment {
        level: Some("low".to_string()),
        score: Some(95.0),
    };
    assert_eq!(ra.resolve_level(&config), Some(RiskLevel::Low));

    let unlabelled = RiskAssessment {
        level: Some("??".to_string()),
        score: Some(72.0),
    };
    assert_eq!(unlabelled.resolve_level(&config), Some(RiskLevel::High));

    assert_eq!(RiskAssessment::default().resolve_level(&config), None);
}

#[test]
fn test_facility_type_parse() {
    assert_eq!(FacilityType::parse("TWY"), Some(FacilityType::Taxiway));
    assert_eq!(FacilityType::parse("机位"), Some(FacilityType::Stand));
    assert_eq!(FacilityType::parse("apron road"), None);
    assert_eq!(FacilityType::Runway.id_prefix(), "runway");
}

#[test]
fn test_presence_semantics() {
    assert!(!is_present(&json!(null)));
    assert!(!is_present(&json!("  ")));
    assert!(!is_present(&json!([])));
    assert!(is_present(&json!(false)));
    assert!(is_present(&json!(0)));
    assert!(!is_truthy(&json!(false)));
    assert!(!is_truthy(&json!("no")));
    assert!(is_truthy(&json!("yes")));
}

#[test]
fn test_snapshot_deserializes_partial_payload() {
    let snapshot: IncidentSnapshot = serde_json::from_value(json!({
        "scenario_type": "oil_spill",
        "incident": {"fluid_type": "FUEL", "position": "501"},
        "mandatory_actions_done": {"notify_fire_dept": "true"},
        "spatial_analysis": {"isolated_nodes": ["stand_501"], "radius": 2}
    }))
    .unwrap();

    assert!(snapshot.has_fact("fluid_type"));
    assert!(snapshot.action_done("notify_fire_dept"));
    assert_eq!(snapshot.isolated_nodes(), ["stand_501".to_string()]);
    assert!(snapshot.risk_assessment.is_none());
    assert!(!snapshot.has_final_report());
}

#[test]
fn test_snapshot_lookup_roots() {
    let snapshot = IncidentSnapshot::new("oil_spill")
        .with_fact("position", "501")
        .with_fact("engine", json!({"status": "running", "ids": [7, 8]}))
        .with_risk(RiskLevel::High)
        .with_action_done("notify_fire_dept");

    assert_eq!(snapshot.lookup(&["incident", "position"]), Some(json!("501")));
    // Bare paths read from `incident`.
    assert_eq!(snapshot.lookup(&["engine", "status"]), Some(json!("running")));
    assert_eq!(snapshot.lookup(&["engine", "ids", "1"]), Some(json!(8)));
    assert_eq!(
        snapshot.lookup(&["risk_assessment", "level"]),
        Some(json!("HIGH"))
    );
    assert_eq!(
        snapshot.lookup(&["mandatory_actions_done", "notify_fire_dept"]),
        Some(json!(true))
    );
    assert_eq!(snapshot.lookup(&["scenario_type"]), Some(json!("oil_spill")));
    assert_eq!(snapshot.lookup(&["final_report"]), None);
    assert_eq!(snapshot.lookup(&["incident", "missing"]), None);
}
