//! Structured span field names shared across subsystems, so log queries can
//! rely on consistent keys.

/// Scenario identifier being evaluated.
pub const SCENARIO: &str = "scenario";

/// Lifecycle stage inferred from the snapshot.
pub const INFERRED_STAGE: &str = "inferred_stage";

/// Anchor node resolved from free-form location text.
pub const ANCHOR_NODE: &str = "anchor_node";

/// Hop radius applied to a propagation.
pub const HOP_RADIUS: &str = "hop_radius";

/// Number of nodes in an isolation zone.
pub const ISOLATED_COUNT: &str = "isolated_count";

/// Time spent parsing a config or graph file, in milliseconds.
pub const LOAD_TIME_MS: &str = "load_time_ms";
