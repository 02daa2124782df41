//! The incident snapshot: caller-owned facts, read-only for every call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::risk::{RiskAssessment, RiskLevel};
use crate::config::ComplianceConfig;
use crate::constants::{FIRE_NOTIFIED_FACT, RISK_ASSESSED_FLAG};

/// Roots a dotted fact path may start with. Anything else is read from
/// `incident`.
pub const SNAPSHOT_ROOTS: &[&str] = &[
    "incident",
    "risk_assessment",
    "mandatory_actions_done",
    "checklist",
    "spatial_analysis",
    "final_report",
    "scenario_type",
];

/// A point-in-time view of everything known about one incident.
///
/// Every field is optional on the wire so partially filled snapshots from the
/// dialogue layer deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentSnapshot {
    pub scenario_type: Option<String>,
    /// Flat fact mapping extracted from the conversation.
    pub incident: Map<String, Value>,
    /// Completed-action flags keyed by action id.
    pub mandatory_actions_done: BTreeMap<String, Value>,
    pub risk_assessment: Option<RiskAssessment>,
    /// Field → confirmed flag.
    pub checklist: BTreeMap<String, Value>,
    /// The most recent spatial analysis, if one was run.
    pub spatial_analysis: Option<SpatialSummary>,
    /// Final report artifact; its presence means the incident is complete.
    pub final_report: Option<Value>,
    /// Serialized lifecycle stage from the previous call.
    pub fsm_state: Option<String>,
    /// Serialized transition history from the previous call.
    pub fsm_history: Vec<Value>,
}

/// The part of a prior spatial analysis the compliance layer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialSummary {
    pub anchor_node: Option<String>,
    pub isolated_nodes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncidentSnapshot {
    pub fn new(scenario_type: &str) -> Self {
        Self {
            scenario_type: Some(scenario_type.to_string()),
            ..Default::default()
        }
    }

    pub fn with_fact(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.incident.insert(key.to_string(), value.into());
        self
    }

    pub fn with_risk(mut self, level: RiskLevel) -> Self {
        self.risk_assessment = Some(RiskAssessment::with_level(level));
        self
    }

    pub fn with_action_done(mut self, action_id: &str) -> Self {
        self.mandatory_actions_done
            .insert(action_id.to_string(), Value::Bool(true));
        self
    }

    pub fn with_isolated_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let summary = self.spatial_analysis.get_or_insert_with(SpatialSummary::default);
        summary.isolated_nodes = nodes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_final_report(mut self, report: impl Into<Value>) -> Self {
        self.final_report = Some(report.into());
        self
    }

    /// Raw incident fact.
    pub fn fact(&self, key: &str) -> Option<&Value> {
        self.incident.get(key)
    }

    /// Fact as trimmed text, when it is a non-empty string or a number.
    pub fn fact_text(&self, key: &str) -> Option<String> {
        match self.incident.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Whether the incident fact exists with a usable value.
    pub fn has_fact(&self, key: &str) -> bool {
        self.incident.get(key).is_some_and(is_present)
    }

    pub fn action_done(&self, action_id: &str) -> bool {
        self.mandatory_actions_done
            .get(action_id)
            .is_some_and(is_truthy)
    }

    pub fn checklist_flag(&self, key: &str) -> bool {
        self.checklist.get(key).is_some_and(is_truthy)
    }

    /// A risk assessment counts once it carries a readable level or a score,
    /// or the checklist confirms it.
    pub fn is_risk_assessed(&self) -> bool {
        let assessed = self.risk_assessment.as_ref().is_some_and(|ra| {
            ra.level.as_deref().and_then(RiskLevel::parse).is_some() || ra.score.is_some()
        });
        assessed || self.checklist_flag(RISK_ASSESSED_FLAG)
    }

    /// Effective risk level: a readable label, else the score through the
    /// configured thresholds.
    pub fn risk_level(&self, config: &ComplianceConfig) -> Option<RiskLevel> {
        self.risk_assessment
            .as_ref()
            .and_then(|ra| ra.resolve_level(config))
    }

    /// The configured fire notification action is done, or the incident
    /// records the fire department as notified.
    pub fn fire_notified(&self, config: &ComplianceConfig) -> bool {
        self.action_done(config.effective_fire_notification_action())
            || self.fact(FIRE_NOTIFIED_FACT).is_some_and(is_truthy)
    }

    pub fn has_final_report(&self) -> bool {
        self.final_report.as_ref().is_some_and(is_present)
    }

    /// Node ids isolated by the last spatial analysis.
    pub fn isolated_nodes(&self) -> &[String] {
        self.spatial_analysis
            .as_ref()
            .map(|s| s.isolated_nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a pre-split dotted path against the snapshot.
    ///
    /// The first segment selects a root (see [`SNAPSHOT_ROOTS`]); unknown
    /// roots are looked up inside `incident`. Array elements are addressed by
    /// numeric segments.
    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Option<Value> {
        let (root, rest) = segments.split_first()?;
        match root.as_ref() {
            "incident" => match rest.split_first() {
                None => Some(Value::Object(self.incident.clone())),
                Some((key, tail)) => descend(self.incident.get(key.as_ref())?, tail),
            },
            "mandatory_actions_done" => descend_map(&self.mandatory_actions_done, rest),
            "checklist" => descend_map(&self.checklist, rest),
            "risk_assessment" => {
                let value = serde_json::to_value(self.risk_assessment.as_ref()?).ok()?;
                descend(&value, rest)
            }
            "spatial_analysis" => {
                let value = serde_json::to_value(self.spatial_analysis.as_ref()?).ok()?;
                descend(&value, rest)
            }
            "final_report" => descend(self.final_report.as_ref()?, rest),
            "scenario_type" if rest.is_empty() => {
                self.scenario_type.clone().map(Value::String)
            }
            _ => {
                let (first, tail) = segments.split_first()?;
                descend(self.incident.get(first.as_ref())?, tail)
            }
        }
    }
}

fn descend_map<S: AsRef<str>>(map: &BTreeMap<String, Value>, rest: &[S]) -> Option<Value> {
    match rest.split_first() {
        None => Some(Value::Object(
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        )),
        Some((key, tail)) => descend(map.get(key.as_ref())?, tail),
    }
}

fn descend<S: AsRef<str>>(value: &Value, rest: &[S]) -> Option<Value> {
    let mut current = value;
    for segment in rest {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current.clone())
}

/// A fact is present when it carries information: not null, not a blank
/// string, not an empty collection. `false` and `0` are answers, so they
/// count.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Flag semantics: present and not an explicit negative.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let t = s.trim().to_lowercase();
            !(t.is_empty() || t == "false" || t == "no" || t == "0" || t == "否")
        }
        other => is_present(other),
    }
}
