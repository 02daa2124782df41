//! ComplianceValidator: checks the inferred stage against the facts and
//! produces remediation signals.

use ramp_core::tracing::fields;
use ramp_core::types::IncidentSnapshot;
use serde::Serialize;
use serde_json::Value;
use tracing::field::Empty;
use tracing::{debug, instrument};

use super::actions::{rank_actions, ActionPriority, ActionSource, PendingAction, SuggestedAction};
use super::engine::ComplianceEngine;
use super::stage::LifecycleStage;
use crate::constraints::ValueProblem;

/// Machine-readable issue kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    PreconditionUnmet,
    StageFieldMissing,
    MandatoryActionPending,
    StageActionPending,
    EnumMismatch,
    PatternMismatch,
    OutOfOrderStage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub message: String,
    /// The condition, field key, or action id the issue is about.
    pub subject: String,
}

impl ValidationIssue {
    fn new(code: IssueCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            subject: subject.into(),
        }
    }
}

/// Per-call verdict. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub stage: LifecycleStage,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub pending_actions: Vec<PendingAction>,
    pub next_actions: Vec<SuggestedAction>,
    pub can_close: bool,
    pub missing_required_fields: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    pub fn has_warning(&self, code: IssueCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

pub struct ComplianceValidator<'a> {
    engine: &'a ComplianceEngine,
}

impl<'a> ComplianceValidator<'a> {
    pub fn new(engine: &'a ComplianceEngine) -> Self {
        Self { engine }
    }

    /// Full validation of the stage the facts support.
    ///
    /// Run this before `sync` when the out-of-order warning matters: it
    /// compares the engine's current stage with the inferred one.
    #[instrument(
        skip_all,
        fields(scenario = %self.engine.constraints().scenario_id, inferred_stage = Empty)
    )]
    pub fn validate(&self, snapshot: &IncidentSnapshot) -> ValidationResult {
        let constraints = self.engine.constraints();
        let config = self.engine.config();
        let stage = self.engine.infer_state(snapshot);
        tracing::Span::current().record(fields::INFERRED_STAGE, stage.id());
        let definition = constraints.stage(stage);

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for condition in &definition.preconditions {
            if !condition.evaluate(snapshot, constraints, config) {
                errors.push(ValidationIssue::new(
                    IssueCode::PreconditionUnmet,
                    condition.to_string(),
                    format!("{stage}: precondition not met: {condition}"),
                ));
            }
        }

        for key in &definition.required_fields {
            let present = constraints
                .field(key)
                .map(|f| f.is_present_in(snapshot))
                .unwrap_or_else(|| snapshot.has_fact(key) || snapshot.checklist_flag(key));
            if !present {
                let label = constraints.field(key).map_or(key.as_str(), |f| f.label.as_str());
                errors.push(ValidationIssue::new(
                    IssueCode::StageFieldMissing,
                    key.clone(),
                    format!("{stage}: required field missing: {label}"),
                ));
            }
        }

        let pending_actions = self.pending_actions(snapshot);
        for pending in &pending_actions {
            errors.push(ValidationIssue::new(
                IssueCode::MandatoryActionPending,
                pending.action_id.clone(),
                format!("mandatory action not completed: {}", pending.description),
            ));
        }

        for action in &definition.required_actions {
            if !snapshot.action_done(action) {
                warnings.push(ValidationIssue::new(
                    IssueCode::StageActionPending,
                    action.clone(),
                    format!("{stage}: expected action not recorded: {action}"),
                ));
            }
        }

        for field in constraints
            .required_fields
            .iter()
            .chain(constraints.optional_fields.iter())
        {
            let Some(value) = snapshot.fact(&field.key) else {
                continue;
            };
            if let Some((problem, message)) = field.value_problem(value) {
                let code = match problem {
                    ValueProblem::NotAllowed => IssueCode::EnumMismatch,
                    ValueProblem::PatternMismatch => IssueCode::PatternMismatch,
                };
                warnings.push(ValidationIssue::new(code, field.key.clone(), message));
            }
        }

        let current = self.engine.stage();
        if current != stage && !current.is_terminal() && !current.can_transition_to(stage) {
            warnings.push(ValidationIssue::new(
                IssueCode::OutOfOrderStage,
                stage.id(),
                format!("facts jump from {current} to {stage}, which skips the normal sequence"),
            ));
        }

        let missing_required_fields = constraints
            .missing_required_fields(snapshot)
            .into_iter()
            .map(|f| f.key.clone())
            .collect();
        let can_close = self.can_close_with(snapshot, &pending_actions);
        let next_actions = self.next_actions_with(snapshot, stage, &pending_actions);

        debug!(
            errors = errors.len(),
            warnings = warnings.len(),
            can_close,
            "validation complete"
        );

        ValidationResult {
            stage,
            errors,
            warnings,
            pending_actions,
            next_actions,
            can_close,
            missing_required_fields,
        }
    }

    /// Triggered mandatory actions that are not yet done, in declared order.
    pub fn pending_actions(&self, snapshot: &IncidentSnapshot) -> Vec<PendingAction> {
        let constraints = self.engine.constraints();
        let config = self.engine.config();
        constraints
            .mandatory_actions
            .iter()
            .filter(|a| a.condition.evaluate(snapshot, constraints, config))
            .filter(|a| !snapshot.action_done(&a.action_id))
            .map(|a| PendingAction {
                action_id: a.action_id.clone(),
                priority: a.priority,
                description: a.description.clone(),
                params: a.params.clone(),
            })
            .collect()
    }

    /// All required fields present, risk assessed, nothing mandatory pending.
    pub fn can_close(&self, snapshot: &IncidentSnapshot) -> bool {
        self.can_close_with(snapshot, &self.pending_actions(snapshot))
    }

    /// Ranked next steps for the inferred stage.
    pub fn next_actions(&self, snapshot: &IncidentSnapshot) -> Vec<SuggestedAction> {
        let stage = self.engine.infer_state(snapshot);
        self.next_actions_with(snapshot, stage, &self.pending_actions(snapshot))
    }

    fn can_close_with(&self, snapshot: &IncidentSnapshot, pending: &[PendingAction]) -> bool {
        self.engine.constraints().all_required_present(snapshot)
            && snapshot.is_risk_assessed()
            && pending.is_empty()
    }

    fn next_actions_with(
        &self,
        snapshot: &IncidentSnapshot,
        stage: LifecycleStage,
        pending: &[PendingAction],
    ) -> Vec<SuggestedAction> {
        let constraints = self.engine.constraints();
        let mut suggestions = Vec::new();

        match stage {
            LifecycleStage::Init => {
                for field in constraints.missing_required_fields(snapshot) {
                    suggestions.push(
                        SuggestedAction::new(
                            format!("ask_{}", field.key),
                            ActionPriority::High,
                            format!("Collect {}", field.label),
                            ActionSource::Stage,
                        )
                        .with_param("field", field.key.as_str())
                        .with_param("label", field.label.as_str()),
                    );
                }
            }
            LifecycleStage::RiskAssessment => {
                suggestions.push(SuggestedAction::new(
                    "assess_risk",
                    ActionPriority::High,
                    "Run the risk assessment for the reported hazard",
                    ActionSource::Stage,
                ));
            }
            LifecycleStage::ImmediateControl => {
                let high = self
                    .engine
                    .risk_level(snapshot)
                    .is_some_and(|l| l.is_high());
                if high && !self.engine.fire_notified(snapshot) {
                    let action = self.engine.config().effective_fire_notification_action();
                    suggestions.push(SuggestedAction::new(
                        action,
                        ActionPriority::Critical,
                        "High risk: notify the fire department immediately",
                        ActionSource::Stage,
                    ));
                }
            }
            LifecycleStage::AreaIsolation if snapshot.isolated_nodes().is_empty() => {
                let mut action = SuggestedAction::new(
                    "calculate_impact_zone",
                    ActionPriority::High,
                    "Compute the isolation zone around the incident position",
                    ActionSource::Stage,
                );
                if let Some(location) = constraints.location_for(snapshot) {
                    action = action.with_param("anchor", Value::String(location));
                }
                suggestions.push(action);
            }
            _ => {}
        }

        suggestions.extend(pending.iter().map(SuggestedAction::from));

        for trigger in &constraints.stage(stage).entry_triggers {
            if !snapshot.action_done(trigger) {
                suggestions.push(SuggestedAction::new(
                    trigger.as_str(),
                    ActionPriority::Medium,
                    format!("Entry action for {stage}"),
                    ActionSource::EntryTrigger,
                ));
            }
        }

        rank_actions(suggestions)
    }
}
