//! Scenario constraints: required facts, mandatory actions, and per-stage
//! requirements loaded from declarative YAML.

pub mod expr;
pub mod loader;
pub mod store;
pub mod types;

pub use expr::{Condition, FactPath};
pub use loader::build_constraints;
pub use store::ConstraintStore;
pub use types::{
    CoreFields, FieldSpec, MandatoryActionTrigger, ScenarioConstraints, ScenarioKind,
    StageDefinition, ValueProblem,
};
