//! Scenario constraint types: fields, mandatory actions, stage requirements.

use std::collections::BTreeMap;

use ramp_core::types::{HazardClass, IncidentSnapshot};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::expr::Condition;
use crate::compliance::actions::ActionPriority;
use crate::compliance::stage::LifecycleStage;

/// The scenario families this engine ships with, plus anything else found in
/// the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ScenarioKind {
    OilSpill,
    BirdStrike,
    Fod,
    /// A scenario defined purely by its config directory.
    Configured(String),
}

impl ScenarioKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            "oil_spill" => Self::OilSpill,
            "bird_strike" => Self::BirdStrike,
            "fod" => Self::Fod,
            other => Self::Configured(other.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::OilSpill => "oil_spill",
            Self::BirdStrike => "bird_strike",
            Self::Fod => "fod",
            Self::Configured(id) => id,
        }
    }

    /// (hazard field, location field) for shipped kinds.
    pub fn default_core_fields(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::OilSpill => Some(("fluid_type", "position")),
            Self::BirdStrike => Some(("event_type", "position")),
            Self::Fod => Some(("fod_type", "position")),
            Self::Configured(_) => None,
        }
    }

    /// Hazard class implied by the scenario itself, if it does not depend on
    /// facts. Spills depend on the fluid.
    pub fn implied_hazard(&self) -> Option<HazardClass> {
        match self {
            Self::BirdStrike => Some(HazardClass::BirdStrike),
            Self::Fod => Some(HazardClass::Debris),
            Self::OilSpill | Self::Configured(_) => None,
        }
    }
}

/// The two facts that move an incident out of `INIT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreFields {
    pub hazard_field: String,
    pub location_field: String,
}

/// A field regex, compiled at load time.
#[derive(Debug, Clone)]
pub struct FieldPattern(Regex);

impl FieldPattern {
    pub fn new(regex: Regex) -> Self {
        Self(regex)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Serialize for FieldPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

/// One fact the scenario asks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub required: bool,
    /// Allowed values (case-insensitive). Empty means unrestricted.
    pub allowed_values: Vec<String>,
    pub pattern: Option<FieldPattern>,
}

impl FieldSpec {
    /// Whether the snapshot holds this field, either as a fact or as a
    /// confirmed checklist entry.
    pub fn is_present_in(&self, snapshot: &IncidentSnapshot) -> bool {
        snapshot.has_fact(&self.key) || snapshot.checklist_flag(&self.key)
    }

    /// Explain why a present value is unacceptable, if it is.
    pub fn value_problem(&self, value: &Value) -> Option<(ValueProblem, String)> {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if !self.allowed_values.is_empty()
            && !self
                .allowed_values
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&text))
        {
            let message = format!(
                "{} '{}' is not one of [{}]",
                self.label,
                text,
                self.allowed_values.join(", ")
            );
            return Some((ValueProblem::NotAllowed, message));
        }
        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(&text) {
                let message = format!("{} '{}' does not match {}", self.label, text, pattern.as_str());
                return Some((ValueProblem::PatternMismatch, message));
            }
        }
        None
    }
}

/// Why a field value was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueProblem {
    NotAllowed,
    PatternMismatch,
}

/// An action that becomes mandatory once its condition holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MandatoryActionTrigger {
    pub action_id: String,
    pub description: String,
    pub priority: ActionPriority,
    pub condition: Condition,
    pub params: BTreeMap<String, Value>,
}

/// What a lifecycle stage demands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDefinition {
    pub stage: LifecycleStage,
    pub preconditions: Vec<Condition>,
    pub required_fields: Vec<String>,
    pub required_actions: Vec<String>,
    /// Actions suggested when the incident enters this stage.
    pub entry_triggers: Vec<String>,
}

impl StageDefinition {
    pub fn empty(stage: LifecycleStage) -> Self {
        Self {
            stage,
            preconditions: Vec::new(),
            required_fields: Vec::new(),
            required_actions: Vec::new(),
            entry_triggers: Vec::new(),
        }
    }
}

/// Everything a scenario demands, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioConstraints {
    pub kind: ScenarioKind,
    pub scenario_id: String,
    pub display_name: String,
    pub core_fields: CoreFields,
    pub required_fields: Vec<FieldSpec>,
    pub optional_fields: Vec<FieldSpec>,
    pub mandatory_actions: Vec<MandatoryActionTrigger>,
    /// One definition per [`LifecycleStage`], in canonical order.
    pub stages: Vec<StageDefinition>,
}

impl ScenarioConstraints {
    /// The definition for a stage. Loading guarantees every stage exists.
    pub fn stage(&self, stage: LifecycleStage) -> &StageDefinition {
        &self.stages[stage.ordinal()]
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.required_fields
            .iter()
            .chain(self.optional_fields.iter())
            .find(|f| f.key == key)
    }

    /// Required fields (flag set) in declared order.
    pub fn mandatory_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.required_fields.iter().filter(|f| f.required)
    }

    /// Required fields the snapshot lacks, in declared order.
    pub fn missing_required_fields(&self, snapshot: &IncidentSnapshot) -> Vec<&FieldSpec> {
        self.mandatory_fields()
            .filter(|f| !f.is_present_in(snapshot))
            .collect()
    }

    pub fn all_required_present(&self, snapshot: &IncidentSnapshot) -> bool {
        self.mandatory_fields().all(|f| f.is_present_in(snapshot))
    }

    pub fn core_facts_present(&self, snapshot: &IncidentSnapshot) -> bool {
        self.field_present(&self.core_fields.hazard_field, snapshot)
            && self.field_present(&self.core_fields.location_field, snapshot)
    }

    fn field_present(&self, key: &str, snapshot: &IncidentSnapshot) -> bool {
        snapshot.has_fact(key) || snapshot.checklist_flag(key)
    }

    /// Hazard class for this incident: implied by the scenario, else read
    /// from the hazard core field.
    pub fn hazard_for(&self, snapshot: &IncidentSnapshot) -> HazardClass {
        if let Some(hazard) = self.kind.implied_hazard() {
            return hazard;
        }
        snapshot
            .fact_text(&self.core_fields.hazard_field)
            .map(|t| HazardClass::parse(&t))
            .unwrap_or(HazardClass::Unknown)
    }

    /// Location text from the location core field.
    pub fn location_for(&self, snapshot: &IncidentSnapshot) -> Option<String> {
        snapshot.fact_text(&self.core_fields.location_field)
    }
}
