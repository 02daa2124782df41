//! Transition records and the serialized engine state carried between calls.

use chrono::{DateTime, Utc};
use ramp_core::types::IncidentSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::stage::LifecycleStage;

/// One applied stage change. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: LifecycleStage,
    pub to: LifecycleStage,
    pub trigger: String,
    pub timestamp: DateTime<Utc>,
    /// True when the edge was not in the transition table and `sync`
    /// applied it anyway.
    #[serde(default)]
    pub forced: bool,
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// Current stage plus append-only history: the whole engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRecord {
    pub stage: LifecycleStage,
    #[serde(default)]
    pub history: Vec<TransitionRecord>,
}

impl Default for EngineRecord {
    fn default() -> Self {
        Self {
            stage: LifecycleStage::Init,
            history: Vec::new(),
        }
    }
}

impl EngineRecord {
    /// Rebuild from the snapshot's `fsm_state` / `fsm_history`.
    pub fn from_snapshot(snapshot: &IncidentSnapshot) -> Self {
        Self::from_parts(snapshot.fsm_state.as_deref(), &snapshot.fsm_history)
    }

    /// Lenient rehydration. Unknown stages become `INIT`, unreadable history
    /// entries are dropped, and the history is cut at the first record whose
    /// `from` does not follow the previous `to`. When history survives, its
    /// last `to` is the current stage.
    pub fn from_parts(state: Option<&str>, history: &[Value]) -> Self {
        let declared = match state {
            None => None,
            Some(text) => match LifecycleStage::parse(text) {
                Some(stage) => Some(stage),
                None => {
                    warn!(state = text, "unknown stored stage, falling back to INIT");
                    None
                }
            },
        };

        let mut records: Vec<TransitionRecord> = Vec::with_capacity(history.len());
        for (i, raw) in history.iter().enumerate() {
            let record = match serde_json::from_value::<TransitionRecord>(raw.clone()) {
                Ok(record) => record,
                Err(e) => {
                    warn!(index = i, error = %e, "skipping malformed history entry");
                    continue;
                }
            };
            if let Some(prev) = records.last() {
                if prev.to != record.from {
                    warn!(
                        index = i,
                        expected = %prev.to,
                        found = %record.from,
                        "history chain broken, truncating"
                    );
                    break;
                }
            }
            records.push(record);
        }

        let stage = match (records.last(), declared) {
            (Some(last), Some(declared)) if last.to != declared => {
                warn!(
                    declared = %declared,
                    history = %last.to,
                    "stored stage disagrees with history, using history"
                );
                last.to
            }
            (Some(last), _) => last.to,
            (None, declared) => declared.unwrap_or(LifecycleStage::Init),
        };

        Self {
            stage,
            history: records,
        }
    }

    /// History as JSON values, the shape `from_parts` reads back.
    pub fn history_values(&self) -> Vec<Value> {
        self.history
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect()
    }

    /// Store this record on a snapshot for the next call.
    pub fn write_to(&self, snapshot: &mut IncidentSnapshot) {
        snapshot.fsm_state = Some(self.stage.id().to_string());
        snapshot.fsm_history = self.history_values();
    }
}
