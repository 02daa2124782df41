//! Shared constants for the ramp engine.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "ramp.toml";

/// Default directory holding one sub-directory per scenario.
pub const DEFAULT_SCENARIOS_DIR: &str = "config/scenarios";

/// Default airfield topology graph file.
pub const DEFAULT_TOPOLOGY_PATH: &str = "config/topology/airfield.json";

/// Required per-scenario field/action definitions.
pub const CHECKLIST_FILE: &str = "checklist.yaml";

/// Optional per-scenario lifecycle stage definitions.
pub const STAGES_FILE: &str = "fsm_states.yaml";

/// Mandatory action that records the fire department was notified.
pub const DEFAULT_FIRE_NOTIFICATION_ACTION: &str = "notify_fire_dept";

/// Incident fact that also counts as fire department notification.
pub const FIRE_NOTIFIED_FACT: &str = "fire_dept_notified";

/// Checklist flag that marks the risk assessment as done.
pub const RISK_ASSESSED_FLAG: &str = "risk_assessed";

// ---- Score-derived risk levels (used only when no level is given) ----

/// Scores at or above this are MEDIUM.
pub const DEFAULT_MEDIUM_SCORE_THRESHOLD: f64 = 30.0;

/// Scores at or above this are HIGH.
pub const DEFAULT_HIGH_SCORE_THRESHOLD: f64 = 60.0;

/// Scores at or above this are CRITICAL.
pub const DEFAULT_CRITICAL_SCORE_THRESHOLD: f64 = 85.0;
