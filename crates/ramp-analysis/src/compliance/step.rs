//! Pure step: serialized record + snapshot in, new record out.

use std::sync::Arc;

use ramp_core::config::ComplianceConfig;
use ramp_core::types::IncidentSnapshot;
use serde::Serialize;

use super::engine::{ComplianceEngine, TransitionOutcome};
use super::record::EngineRecord;
use super::stage::LifecycleStage;
use super::validator::{ComplianceValidator, ValidationResult};
use crate::constraints::ScenarioConstraints;

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub inferred: LifecycleStage,
    pub transition: TransitionOutcome,
}

/// Rehydrate an engine from `record`, sync it to `snapshot`, and return the
/// updated record. Inputs are not modified.
pub fn step(
    constraints: &Arc<ScenarioConstraints>,
    record: EngineRecord,
    snapshot: &IncidentSnapshot,
    config: &ComplianceConfig,
) -> (EngineRecord, StepOutcome) {
    let mut engine = ComplianceEngine::rehydrate(Arc::clone(constraints), config.clone(), record);
    let inferred = engine.infer_state(snapshot);
    let transition = engine.sync(snapshot);
    (engine.into_record(), StepOutcome { inferred, transition })
}

/// Validation followed by a step, the usual per-turn call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub record: EngineRecord,
    pub outcome: StepOutcome,
    pub validation: ValidationResult,
}

/// Validate against the record's stage, then sync. The validation sees the
/// pre-sync stage, so out-of-order jumps show up as warnings.
pub fn assess(
    constraints: &Arc<ScenarioConstraints>,
    record: EngineRecord,
    snapshot: &IncidentSnapshot,
    config: &ComplianceConfig,
) -> Assessment {
    let mut engine = ComplianceEngine::rehydrate(Arc::clone(constraints), config.clone(), record);
    let validation = ComplianceValidator::new(&engine).validate(snapshot);
    let inferred = validation.stage;
    let transition = engine.sync(snapshot);
    Assessment {
        record: engine.into_record(),
        outcome: StepOutcome { inferred, transition },
        validation,
    }
}
