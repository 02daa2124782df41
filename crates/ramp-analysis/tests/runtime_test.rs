//! Runtime wiring tests: config resolution, preload, assess, impact.

use std::path::{Path, PathBuf};

use ramp_analysis::compliance::{LifecycleStage, TransitionOutcome};
use ramp_analysis::spatial::ZoneStatus;
use ramp_analysis::{RampRuntime, RuntimeOptions};
use ramp_core::errors::{ConstraintError, InitError, RampErrorCode};
use ramp_core::types::{HazardClass, IncidentSnapshot, RiskLevel};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn options() -> RuntimeOptions {
    let root = workspace_root();
    RuntimeOptions {
        scenarios_dir: Some(root.join("config/scenarios")),
        graph_path: Some(root.join("config/topology/airfield.json")),
        ..Default::default()
    }
}

#[test]
fn test_new_with_explicit_paths() {
    let runtime = RampRuntime::new(options()).unwrap();
    assert_eq!(runtime.graph.node_count(), 15);
    assert_eq!(runtime.topology.load_count(), 1);
    assert!(runtime.constraints.cached_scenarios().is_empty());
}

#[test]
fn test_preload_option_loads_every_scenario() {
    let runtime = RampRuntime::new(RuntimeOptions {
        preload: Some(true),
        ..options()
    })
    .unwrap();
    assert_eq!(
        runtime.constraints.cached_scenarios(),
        ["bird_strike", "fod", "oil_spill"]
    );
}

#[test]
fn test_project_root_uses_ramp_toml() {
    let runtime = RampRuntime::new(RuntimeOptions {
        project_root: Some(workspace_root()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(runtime.constraints.load_count(), 3);
    assert_eq!(runtime.graph.runway_count(), 2);
}

#[test]
fn test_config_toml_paths_resolve_against_root() {
    let toml = r#"
[constraints]
scenarios_dir = "config/scenarios"

[topology]
graph_path = "config/topology/airfield.json"

[compliance]
fire_notification_action = "call_fire_station"
"#;
    let runtime = RampRuntime::new(RuntimeOptions {
        project_root: Some(workspace_root()),
        config_toml: Some(toml.to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        runtime.config.compliance.effective_fire_notification_action(),
        "call_fire_station"
    );
    assert!(runtime.constraints.cached_scenarios().is_empty());

    let snap = IncidentSnapshot::new("oil_spill")
        .with_fact("fluid_type", "FUEL")
        .with_fact("position", "stand_501")
        .with_risk(RiskLevel::High)
        .with_action_done("call_fire_station");
    let assessment = runtime.assess(&snap).unwrap();
    assert_eq!(assessment.validation.stage, LifecycleStage::ResourceDispatch);
}

#[test]
fn test_missing_graph_fails_init() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = RampRuntime::new(RuntimeOptions {
        graph_path: Some(dir.path().join("absent.json")),
        ..options()
    })
    .err()
    .unwrap();
    assert!(matches!(err, InitError::Topology(_)));
    assert_eq!(err.error_code(), "GRAPH_NOT_FOUND");
}

#[test]
fn test_broken_scenario_fails_preload() {
    let dir = tempfile::TempDir::new().unwrap();
    let broken = dir.path().join("oil_spill");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("checklist.yaml"), "required_fields: 3").unwrap();

    let err = RampRuntime::new(RuntimeOptions {
        scenarios_dir: Some(dir.path().to_path_buf()),
        preload: Some(true),
        ..options()
    })
    .err()
    .unwrap();
    assert!(matches!(err, InitError::Constraint(ConstraintError::ConfigInvalid { .. })));
    assert_eq!(err.error_code(), "CONFIG_INVALID");
}

#[test]
fn test_assess_and_reassess() {
    let runtime = RampRuntime::new(options()).unwrap();
    let mut snap = IncidentSnapshot::new("oil_spill")
        .with_fact("fluid_type", "HYDRAULIC")
        .with_fact("position", "taxiway A2");

    let first = runtime.assess(&snap).unwrap();
    assert_eq!(first.record.stage, LifecycleStage::RiskAssessment);
    assert!(first.outcome.transition.is_applied());
    assert!(first
        .validation
        .pending_actions
        .iter()
        .any(|p| p.action_id == "notify_maintenance"));

    first.record.write_to(&mut snap);
    let second = runtime.assess(&snap).unwrap();
    assert_eq!(second.outcome.transition, TransitionOutcome::Unchanged);
    assert_eq!(second.record, first.record);
}

#[test]
fn test_assess_unknown_scenario() {
    let runtime = RampRuntime::new(options()).unwrap();
    let err = runtime.assess(&IncidentSnapshot::new("volcano")).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_NOT_FOUND");
    assert!(runtime.assess(&IncidentSnapshot::default()).is_err());
}

#[test]
fn test_impact_from_location_text() {
    let runtime = RampRuntime::new(options()).unwrap();
    let report = runtime.impact("501机位", HazardClass::Fuel, Some(RiskLevel::High));
    assert_eq!(report.zone.anchor_node.as_deref(), Some("stand_501"));
    assert_eq!(report.zone.isolated_count(), 11);
    assert_eq!(report.position.closure_minutes, 90);

    let missing = runtime.impact("gate 999", HazardClass::Fuel, None);
    assert_eq!(missing.zone.status, ZoneStatus::LocationNotFound);
    assert!(!missing.position.is_resolved());
}

#[test]
fn test_impact_for_snapshot() {
    let runtime = RampRuntime::new(options()).unwrap();

    let no_location = IncidentSnapshot::new("fod").with_fact("fod_type", "bolt");
    assert!(runtime.impact_for(&no_location).unwrap().is_none());

    let snap = no_location
        .with_fact("position", "stand 601")
        .with_risk(RiskLevel::Medium);
    let report = runtime.impact_for(&snap).unwrap().unwrap();
    assert_eq!(report.zone.hazard, HazardClass::Debris);
    assert_eq!(report.zone.anchor_node.as_deref(), Some("stand_601"));
    assert_eq!(report.zone.transitive_runways, ["runway_01R"]);
    assert_eq!(report.position.risk_level, RiskLevel::Medium);
}

#[test]
fn test_global_runtime_initializes_once() {
    assert!(RampRuntime::get().is_none());
    let runtime = RampRuntime::initialize(options()).unwrap();
    let global = RampRuntime::get().unwrap();
    assert!(std::sync::Arc::ptr_eq(&runtime, &global));

    let err = RampRuntime::initialize(options()).err().unwrap();
    assert!(matches!(err, InitError::AlreadyInitialized));
    assert_eq!(err.error_code(), "ALREADY_INITIALIZED");
}
