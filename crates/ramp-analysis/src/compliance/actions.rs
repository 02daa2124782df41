//! Remediation actions: priorities, pending mandatory actions, suggestions,
//! and ranking.

use std::collections::BTreeMap;

use ramp_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Urgency of an action. Sorts `Critical` first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    Critical,
    #[default]
    High,
    Medium,
    Low,
}

impl ActionPriority {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "critical" | "p0" => Some(Self::Critical),
            "high" | "p1" => Some(Self::High),
            "medium" | "normal" | "p2" => Some(Self::Medium),
            "low" | "p3" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A mandatory action whose trigger holds but which is not yet done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action_id: String,
    pub priority: ActionPriority,
    pub description: String,
    pub params: BTreeMap<String, Value>,
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// Stage-specific guidance computed by the validator.
    Stage,
    /// A triggered, incomplete mandatory action.
    Mandatory,
    /// An entry trigger of the inferred stage.
    EntryTrigger,
}

/// One ranked next-step suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub action_id: String,
    pub priority: ActionPriority,
    pub description: String,
    pub params: BTreeMap<String, Value>,
    pub source: ActionSource,
}

impl SuggestedAction {
    pub fn new(
        action_id: impl Into<String>,
        priority: ActionPriority,
        description: impl Into<String>,
        source: ActionSource,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            priority,
            description: description.into(),
            params: BTreeMap::new(),
            source,
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

impl From<&PendingAction> for SuggestedAction {
    fn from(pending: &PendingAction) -> Self {
        Self {
            action_id: pending.action_id.clone(),
            priority: pending.priority,
            description: pending.description.clone(),
            params: pending.params.clone(),
            source: ActionSource::Mandatory,
        }
    }
}

/// Deduplicate by action id and sort critical > high > medium > low.
///
/// A duplicate keeps the higher priority; on equal priority the first
/// occurrence wins. Sorting is stable, so equal priorities keep input order.
pub fn rank_actions(actions: Vec<SuggestedAction>) -> Vec<SuggestedAction> {
    let mut position: FxHashMap<String, usize> = FxHashMap::default();
    let mut unique: Vec<SuggestedAction> = Vec::with_capacity(actions.len());

    for action in actions {
        match position.get(&action.action_id) {
            Some(&idx) => {
                if action.priority < unique[idx].priority {
                    unique[idx] = action;
                }
            }
            None => {
                position.insert(action.action_id.clone(), unique.len());
                unique.push(action);
            }
        }
    }

    unique.sort_by_key(|a| a.priority);
    unique
}
