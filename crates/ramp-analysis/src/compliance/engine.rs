//! ComplianceEngine: stage inference and transitions for one incident.
//!
//! The engine holds no memory between calls. Callers rehydrate it from the
//! snapshot's serialized record, run `sync`, and store the record back.

use std::sync::Arc;

use chrono::Utc;
use ramp_core::config::ComplianceConfig;
use ramp_core::types::{IncidentSnapshot, RiskLevel};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::record::{EngineRecord, TransitionRecord};
use super::stage::LifecycleStage;
use crate::constraints::ScenarioConstraints;

/// Result of asking the engine to move.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The stage changed; this record was appended.
    Applied(TransitionRecord),
    /// Already at the target stage. Nothing recorded.
    Unchanged,
    /// Not applied. The engine is untouched.
    Rejected {
        from: LifecycleStage,
        to: LifecycleStage,
        reason: String,
    },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

pub struct ComplianceEngine {
    constraints: Arc<ScenarioConstraints>,
    config: ComplianceConfig,
    stage: LifecycleStage,
    history: Vec<TransitionRecord>,
}

impl ComplianceEngine {
    /// A fresh engine at `INIT`.
    pub fn new(constraints: Arc<ScenarioConstraints>, config: ComplianceConfig) -> Self {
        Self::rehydrate(constraints, config, EngineRecord::default())
    }

    pub fn rehydrate(
        constraints: Arc<ScenarioConstraints>,
        config: ComplianceConfig,
        record: EngineRecord,
    ) -> Self {
        Self {
            constraints,
            config,
            stage: record.stage,
            history: record.history,
        }
    }

    /// Rehydrate from the snapshot's `fsm_state` / `fsm_history`.
    pub fn from_snapshot(
        constraints: Arc<ScenarioConstraints>,
        config: ComplianceConfig,
        snapshot: &IncidentSnapshot,
    ) -> Self {
        Self::rehydrate(constraints, config, EngineRecord::from_snapshot(snapshot))
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    pub fn constraints(&self) -> &ScenarioConstraints {
        &self.constraints
    }

    pub fn config(&self) -> &ComplianceConfig {
        &self.config
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn record(&self) -> EngineRecord {
        EngineRecord {
            stage: self.stage,
            history: self.history.clone(),
        }
    }

    pub fn into_record(self) -> EngineRecord {
        EngineRecord {
            stage: self.stage,
            history: self.history,
        }
    }

    /// Effective risk level: explicit label, else score through the
    /// configured thresholds.
    pub fn risk_level(&self, snapshot: &IncidentSnapshot) -> Option<RiskLevel> {
        snapshot.risk_level(&self.config)
    }

    pub fn fire_notified(&self, snapshot: &IncidentSnapshot) -> bool {
        snapshot.fire_notified(&self.config)
    }

    /// Infer the stage the facts support. First matching rule wins:
    ///
    /// 1. final report present: `COMPLETED`
    /// 2. every required field and a risk assessment: `P4_AREA_ISOLATION`
    ///    while nodes are isolated, else `P8_CLOSE`
    /// 3. risk assessed, high and fire not notified: `P2_IMMEDIATE_CONTROL`;
    ///    high and notified: `P3_RESOURCE_DISPATCH`; below high (or a bare
    ///    checklist confirmation): `P4_AREA_ISOLATION`
    /// 4. both core facts: `P1_RISK_ASSESS`
    /// 5. otherwise `INIT`
    pub fn infer_state(&self, snapshot: &IncidentSnapshot) -> LifecycleStage {
        if snapshot.has_final_report() {
            return LifecycleStage::Completed;
        }

        let assessed = snapshot.is_risk_assessed();
        if assessed && self.constraints.all_required_present(snapshot) {
            return if snapshot.isolated_nodes().is_empty() {
                LifecycleStage::Closure
            } else {
                LifecycleStage::AreaIsolation
            };
        }

        if assessed {
            let high = self.risk_level(snapshot).is_some_and(|l| l.is_high());
            return match (high, self.fire_notified(snapshot)) {
                (true, false) => LifecycleStage::ImmediateControl,
                (true, true) => LifecycleStage::ResourceDispatch,
                (false, _) => LifecycleStage::AreaIsolation,
            };
        }

        if self.constraints.core_facts_present(snapshot) {
            return LifecycleStage::RiskAssessment;
        }

        LifecycleStage::Init
    }

    /// Move along a legal edge. Illegal edges and moves out of a terminal
    /// stage are rejected without side effects.
    pub fn transition(
        &mut self,
        to: LifecycleStage,
        trigger: &str,
        context: Map<String, Value>,
    ) -> TransitionOutcome {
        if to == self.stage {
            return TransitionOutcome::Unchanged;
        }
        if let Some(reason) = self.rejection(to) {
            return TransitionOutcome::Rejected {
                from: self.stage,
                to,
                reason,
            };
        }
        TransitionOutcome::Applied(self.apply(to, trigger, context, false))
    }

    /// Bring the engine to the inferred stage. Illegal edges are applied
    /// anyway and flagged `forced`; a terminal stage is never left.
    #[instrument(skip(self, snapshot), fields(scenario = %self.constraints.scenario_id, from = %self.stage))]
    pub fn sync(&mut self, snapshot: &IncidentSnapshot) -> TransitionOutcome {
        let inferred = self.infer_state(snapshot);
        if inferred == self.stage {
            debug!(stage = %inferred, "stage unchanged");
            return TransitionOutcome::Unchanged;
        }
        if self.stage.is_terminal() {
            warn!(inferred = %inferred, "incident already completed; ignoring inferred stage");
            return TransitionOutcome::Rejected {
                from: self.stage,
                to: inferred,
                reason: format!("{} is terminal", self.stage),
            };
        }

        let mut context = Map::new();
        context.insert("inferred".to_string(), Value::String(inferred.id().to_string()));
        let forced = !self.stage.can_transition_to(inferred);
        if forced {
            warn!(
                to = %inferred,
                "forcing out-of-order transition to match facts"
            );
        }
        TransitionOutcome::Applied(self.apply(inferred, "sync", context, forced))
    }

    fn rejection(&self, to: LifecycleStage) -> Option<String> {
        if self.stage.is_terminal() {
            Some(format!("{} is terminal", self.stage))
        } else if !self.stage.can_transition_to(to) {
            Some(format!("no transition {} -> {}", self.stage, to))
        } else {
            None
        }
    }

    fn apply(
        &mut self,
        to: LifecycleStage,
        trigger: &str,
        context: Map<String, Value>,
        forced: bool,
    ) -> TransitionRecord {
        let record = TransitionRecord {
            from: self.stage,
            to,
            trigger: trigger.to_string(),
            timestamp: Utc::now(),
            forced,
            context,
        };
        self.stage = to;
        self.history.push(record.clone());
        record
    }
}
