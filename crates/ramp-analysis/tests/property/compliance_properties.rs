use std::path::Path;
use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use ramp_analysis::compliance::{
    step, ComplianceEngine, ComplianceValidator, EngineRecord, LifecycleStage,
};
use ramp_analysis::constraints::{ConstraintStore, ScenarioConstraints};
use ramp_core::config::ComplianceConfig;
use ramp_core::types::{IncidentSnapshot, RiskAssessment, RiskLevel};

const FLUIDS: &[&str] = &["FUEL", "HYDRAULIC", "OIL"];
const ENGINE: &[&str] = &["RUNNING", "STOPPED"];
const LOCALIZED: &[&str] = &["低", "中", "高", "严重"];
const SCORES: &[f64] = &[10.0, 45.0, 70.0, 95.0];

fn oil_spill() -> Arc<ScenarioConstraints> {
    static CONSTRAINTS: OnceLock<Arc<ScenarioConstraints>> = OnceLock::new();
    CONSTRAINTS
        .get_or_init(|| {
            let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/scenarios");
            ConstraintStore::new(dir).load("oil_spill").unwrap()
        })
        .clone()
}

/// Knobs for one generated snapshot.
#[derive(Debug, Clone)]
struct Facts {
    fluid: Option<usize>,
    position: bool,
    rest: bool,
    engine: usize,
    risk: Option<usize>,
    fire_done: bool,
    isolated: bool,
    report: bool,
}

fn facts() -> impl Strategy<Value = Facts> {
    (
        proptest::option::of(0..FLUIDS.len()),
        any::<bool>(),
        any::<bool>(),
        0..ENGINE.len(),
        proptest::option::of(0..RiskLevel::all().len()),
        any::<bool>(),
        any::<bool>(),
        proptest::bool::weighted(0.1),
    )
        .prop_map(
            |(fluid, position, rest, engine, risk, fire_done, isolated, report)| Facts {
                fluid,
                position,
                rest,
                engine,
                risk,
                fire_done,
                isolated,
                report,
            },
        )
}

fn build(f: &Facts) -> IncidentSnapshot {
    let mut snap = IncidentSnapshot::new("oil_spill");
    if let Some(i) = f.fluid {
        snap = snap.with_fact("fluid_type", FLUIDS[i]);
    }
    if f.position {
        snap = snap.with_fact("position", "stand_501");
    }
    if f.rest {
        snap = snap
            .with_fact("flight_no", "CA1234")
            .with_fact("leak_size", "MEDIUM")
            .with_fact("engine_status", ENGINE[f.engine]);
    }
    if let Some(i) = f.risk {
        snap = snap.with_risk(RiskLevel::all()[i]);
    }
    if f.fire_done {
        snap = snap.with_action_done("notify_fire_dept");
    }
    if f.isolated {
        snap = snap.with_isolated_nodes(["stand_501"]);
    }
    if f.report {
        snap = snap.with_final_report("closed");
    }
    snap
}

/// The same level written the ways upstream scorers write it: canonical
/// name, `R1`..`R4`, localized name, or a bare score.
fn assessment_for(level: RiskLevel, form: usize) -> RiskAssessment {
    let i = RiskLevel::all()
        .iter()
        .position(|l| *l == level)
        .unwrap_or_default();
    match form {
        0 => RiskAssessment::with_level(level),
        1 => RiskAssessment {
            level: Some(format!("R{}", i + 1)),
            score: None,
        },
        2 => RiskAssessment {
            level: Some(LOCALIZED[i].to_string()),
            score: None,
        },
        _ => RiskAssessment {
            level: None,
            score: Some(SCORES[i]),
        },
    }
}

proptest! {
    #[test]
    fn missing_core_fact_without_risk_is_init(f in facts()) {
        prop_assume!(f.fluid.is_none() || !f.position);
        let f = Facts { risk: None, report: false, ..f };
        let engine = ComplianceEngine::new(oil_spill(), ComplianceConfig::default());
        prop_assert_eq!(engine.infer_state(&build(&f)), LifecycleStage::Init);
    }

    #[test]
    fn can_close_matches_triggered_actions(
        fluid in 0..FLUIDS.len(),
        engine_status in 0..ENGINE.len(),
        risk in 0..RiskLevel::all().len(),
        form in 0usize..4,
        done in proptest::array::uniform3(any::<bool>()),
    ) {
        let level = RiskLevel::all()[risk];
        let mut snap = IncidentSnapshot::new("oil_spill")
            .with_fact("flight_no", "CA1234")
            .with_fact("fluid_type", FLUIDS[fluid])
            .with_fact("position", "stand_501")
            .with_fact("leak_size", "SMALL")
            .with_fact("engine_status", ENGINE[engine_status]);
        snap.risk_assessment = Some(assessment_for(level, form));
        let actions = ["notify_fire_dept", "stop_engine", "notify_maintenance"];
        for (action, is_done) in actions.into_iter().zip(done) {
            if is_done {
                snap = snap.with_action_done(action);
            }
        }

        let needs_fire = level.is_high();
        let needs_stop = FLUIDS[fluid] == "FUEL" && ENGINE[engine_status] == "RUNNING";
        let needs_maintenance = FLUIDS[fluid] != "FUEL";
        let expected = (!needs_fire || done[0])
            && (!needs_stop || done[1])
            && (!needs_maintenance || done[2]);

        let engine = ComplianceEngine::new(oil_spill(), ComplianceConfig::default());
        prop_assert_eq!(engine.risk_level(&snap), Some(level));
        prop_assert_eq!(ComplianceValidator::new(&engine).can_close(&snap), expected);
    }

    #[test]
    fn stepping_keeps_a_valid_chain(sequence in proptest::collection::vec(facts(), 1..8)) {
        let constraints = oil_spill();
        let config = ComplianceConfig::default();
        let mut record = EngineRecord::default();
        let mut completed = false;

        for f in &sequence {
            let mut snap = build(f);
            record.write_to(&mut snap);
            let restored = EngineRecord::from_snapshot(&snap);
            prop_assert_eq!(&restored, &record);

            let (next, _) = step(&constraints, restored, &snap, &config);
            record = next;

            if completed {
                prop_assert_eq!(record.stage, LifecycleStage::Completed);
            }
            completed |= record.stage == LifecycleStage::Completed;
        }

        if let Some(first) = record.history.first() {
            prop_assert_eq!(first.from, LifecycleStage::Init);
        }
        for pair in record.history.windows(2) {
            prop_assert_eq!(pair[0].to, pair[1].from);
        }
        let last = record.history.last().map_or(LifecycleStage::Init, |r| r.to);
        prop_assert_eq!(last, record.stage);
    }
}
