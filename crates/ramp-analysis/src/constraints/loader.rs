//! Parse scenario YAML into [`ScenarioConstraints`].
//!
//! Raw serde structs mirror the files; conversion compiles conditions and
//! patterns so a loaded scenario never needs re-parsing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ramp_core::constants::{CHECKLIST_FILE, STAGES_FILE};
use ramp_core::errors::ConstraintError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::expr::Condition;
use super::types::{
    CoreFields, FieldPattern, FieldSpec, MandatoryActionTrigger, ScenarioConstraints,
    ScenarioKind, StageDefinition,
};
use crate::compliance::actions::ActionPriority;
use crate::compliance::stage::LifecycleStage;

// ---- checklist.yaml ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChecklist {
    #[serde(default)]
    scenario_id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    core_fields: Option<RawCoreFields>,
    #[serde(default)]
    required_fields: Vec<RawField>,
    #[serde(default)]
    optional_fields: Vec<RawField>,
    #[serde(default)]
    mandatory_actions: Vec<RawMandatoryAction>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCoreFields {
    hazard: String,
    location: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    key: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default, rename = "enum")]
    allowed: Vec<String>,
    #[serde(default)]
    pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMandatoryAction {
    id: String,
    when: String,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    params: BTreeMap<String, Value>,
}

// ---- fsm_states.yaml ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStages {
    #[serde(default)]
    stages: Vec<RawStage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStage {
    id: String,
    #[serde(default)]
    preconditions: Vec<String>,
    #[serde(default)]
    required_fields: Vec<String>,
    #[serde(default)]
    required_actions: Vec<String>,
    #[serde(default)]
    entry_triggers: Vec<String>,
}

/// Built-in stage requirements, used for every stage `fsm_states.yaml` does
/// not redefine: (stage, preconditions, entry triggers).
const DEFAULT_STAGES: &[(LifecycleStage, &[&str], &[&str])] = &[
    (LifecycleStage::Init, &[], &[]),
    (LifecycleStage::RiskAssessment, &["core_facts_present"], &[]),
    (
        LifecycleStage::ImmediateControl,
        &["core_facts_present", "risk_assessed"],
        &["activate_emergency_response"],
    ),
    (
        LifecycleStage::ResourceDispatch,
        &[
            "core_facts_present",
            "risk_assessed",
            "fire_notified",
        ],
        &["dispatch_response_team"],
    ),
    (
        LifecycleStage::AreaIsolation,
        &["core_facts_present", "risk_assessed"],
        &["establish_isolation_perimeter"],
    ),
    (
        LifecycleStage::Cleanup,
        &["required_facts_present", "risk_assessed"],
        &["dispatch_cleanup_crew"],
    ),
    (
        LifecycleStage::Verification,
        &["required_facts_present"],
        &["inspect_surface"],
    ),
    (
        LifecycleStage::Recovery,
        &["required_facts_present"],
        &["reopen_facilities"],
    ),
    (
        LifecycleStage::Closure,
        &["required_facts_present", "risk_assessed"],
        &["generate_final_report"],
    ),
    (LifecycleStage::Completed, &["final_report"], &[]),
];

/// Read and build one scenario from `<dir>/<scenario_id>/`.
pub fn load_scenario(dir: &Path, scenario_id: &str) -> Result<ScenarioConstraints, ConstraintError> {
    let scenario_dir = dir.join(scenario_id);
    let checklist_path = scenario_dir.join(CHECKLIST_FILE);
    if !checklist_path.is_file() {
        return Err(ConstraintError::ConfigNotFound {
            scenario: scenario_id.to_string(),
            path: checklist_path.display().to_string(),
        });
    }

    let checklist = fs::read_to_string(&checklist_path)
        .map_err(|e| ConstraintError::invalid(scenario_id, CHECKLIST_FILE, e.to_string()))?;

    let stages_path = scenario_dir.join(STAGES_FILE);
    let stages = if stages_path.is_file() {
        Some(
            fs::read_to_string(&stages_path)
                .map_err(|e| ConstraintError::invalid(scenario_id, STAGES_FILE, e.to_string()))?,
        )
    } else {
        None
    };

    build_constraints(scenario_id, &checklist, stages.as_deref())
}

/// Build constraints from file contents. `stages` is the optional
/// `fsm_states.yaml` text.
pub fn build_constraints(
    scenario_id: &str,
    checklist: &str,
    stages: Option<&str>,
) -> Result<ScenarioConstraints, ConstraintError> {
    let raw: RawChecklist = serde_yaml::from_str(checklist)
        .map_err(|e| ConstraintError::invalid(scenario_id, CHECKLIST_FILE, e.to_string()))?;

    if let Some(ref declared) = raw.scenario_id {
        if !declared.trim().eq_ignore_ascii_case(scenario_id) {
            return Err(ConstraintError::invalid(
                scenario_id,
                CHECKLIST_FILE,
                format!("scenario_id '{declared}' does not match directory '{scenario_id}'"),
            ));
        }
    }

    let kind = ScenarioKind::from_id(scenario_id);
    let required_fields = convert_fields(scenario_id, raw.required_fields, true)?;
    let optional_fields = convert_fields(scenario_id, raw.optional_fields, false)?;
    let core_fields = resolve_core_fields(scenario_id, &kind, raw.core_fields, &required_fields)?;

    let mut mandatory_actions = Vec::with_capacity(raw.mandatory_actions.len());
    for action in raw.mandatory_actions {
        mandatory_actions.push(convert_action(scenario_id, action)?);
    }

    let stages = build_stages(scenario_id, stages)?;

    Ok(ScenarioConstraints {
        kind,
        scenario_id: scenario_id.to_string(),
        display_name: raw.display_name.unwrap_or_else(|| scenario_id.to_string()),
        core_fields,
        required_fields,
        optional_fields,
        mandatory_actions,
        stages,
    })
}

fn convert_fields(
    scenario_id: &str,
    raw: Vec<RawField>,
    required_by_default: bool,
) -> Result<Vec<FieldSpec>, ConstraintError> {
    let mut fields: Vec<FieldSpec> = Vec::with_capacity(raw.len());
    for field in raw {
        let key = field.key.trim().to_string();
        if key.is_empty() {
            return Err(ConstraintError::invalid(scenario_id, CHECKLIST_FILE, "field with empty key"));
        }
        if fields.iter().any(|f| f.key == key) {
            return Err(ConstraintError::invalid(
                scenario_id,
                CHECKLIST_FILE,
                format!("duplicate field '{key}'"),
            ));
        }
        let pattern = match field.pattern {
            Some(source) => Some(FieldPattern::new(Regex::new(&source).map_err(|e| {
                ConstraintError::invalid(
                    scenario_id,
                    CHECKLIST_FILE,
                    format!("field '{key}' pattern: {e}"),
                )
            })?)),
            None => None,
        };
        fields.push(FieldSpec {
            label: field.label.unwrap_or_else(|| key.clone()),
            required: field.required.unwrap_or(required_by_default),
            allowed_values: field.allowed,
            pattern,
            key,
        });
    }
    Ok(fields)
}

fn resolve_core_fields(
    scenario_id: &str,
    kind: &ScenarioKind,
    declared: Option<RawCoreFields>,
    required: &[FieldSpec],
) -> Result<CoreFields, ConstraintError> {
    if let Some(core) = declared {
        return Ok(CoreFields {
            hazard_field: core.hazard,
            location_field: core.location,
        });
    }
    if let Some((hazard, location)) = kind.default_core_fields() {
        return Ok(CoreFields {
            hazard_field: hazard.to_string(),
            location_field: location.to_string(),
        });
    }
    match required {
        [first, second, ..] => Ok(CoreFields {
            hazard_field: first.key.clone(),
            location_field: second.key.clone(),
        }),
        _ => Err(ConstraintError::invalid(
            scenario_id,
            CHECKLIST_FILE,
            "no core_fields declared and fewer than two required fields",
        )),
    }
}

fn convert_action(
    scenario_id: &str,
    raw: RawMandatoryAction,
) -> Result<MandatoryActionTrigger, ConstraintError> {
    let condition = Condition::parse(&raw.when).map_err(|e| {
        ConstraintError::invalid(
            scenario_id,
            CHECKLIST_FILE,
            format!("mandatory action '{}': {e}", raw.id),
        )
    })?;
    let priority = match raw.priority {
        Some(text) => ActionPriority::parse(&text).ok_or_else(|| {
            ConstraintError::invalid(
                scenario_id,
                CHECKLIST_FILE,
                format!("mandatory action '{}': unknown priority '{text}'", raw.id),
            )
        })?,
        None => ActionPriority::default(),
    };
    Ok(MandatoryActionTrigger {
        description: raw.description.unwrap_or_else(|| raw.id.clone()),
        action_id: raw.id,
        priority,
        condition,
        params: raw.params,
    })
}

fn build_stages(
    scenario_id: &str,
    text: Option<&str>,
) -> Result<Vec<StageDefinition>, ConstraintError> {
    let mut stages = Vec::with_capacity(DEFAULT_STAGES.len());
    for (stage, preconditions, triggers) in DEFAULT_STAGES {
        stages.push(StageDefinition {
            preconditions: parse_conditions(scenario_id, "built-in stages", preconditions)?,
            entry_triggers: triggers.iter().map(|t| t.to_string()).collect(),
            ..StageDefinition::empty(*stage)
        });
    }

    let Some(text) = text else {
        return Ok(stages);
    };
    let raw: RawStages = serde_yaml::from_str(text)
        .map_err(|e| ConstraintError::invalid(scenario_id, STAGES_FILE, e.to_string()))?;

    let mut seen = Vec::new();
    for entry in raw.stages {
        let stage = LifecycleStage::parse(&entry.id).ok_or_else(|| {
            ConstraintError::invalid(
                scenario_id,
                STAGES_FILE,
                format!("unknown stage '{}'", entry.id),
            )
        })?;
        if seen.contains(&stage) {
            return Err(ConstraintError::invalid(
                scenario_id,
                STAGES_FILE,
                format!("stage '{stage}' defined twice"),
            ));
        }
        seen.push(stage);
        stages[stage.ordinal()] = StageDefinition {
            stage,
            preconditions: parse_conditions(scenario_id, STAGES_FILE, &entry.preconditions)?,
            required_fields: entry.required_fields,
            required_actions: entry.required_actions,
            entry_triggers: entry.entry_triggers,
        };
    }
    Ok(stages)
}

fn parse_conditions<S: AsRef<str>>(
    scenario_id: &str,
    file: &str,
    sources: &[S],
) -> Result<Vec<Condition>, ConstraintError> {
    sources
        .iter()
        .map(|s| {
            Condition::parse(s.as_ref()).map_err(|e| {
                ConstraintError::invalid(scenario_id, file, format!("'{}': {e}", s.as_ref()))
            })
        })
        .collect()
}
