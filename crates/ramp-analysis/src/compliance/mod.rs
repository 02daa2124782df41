//! Compliance: lifecycle stages, stage inference, transitions, validation.

pub mod actions;
pub mod engine;
pub mod record;
pub mod stage;
pub mod step;
pub mod validator;

pub use actions::{rank_actions, ActionPriority, ActionSource, PendingAction, SuggestedAction};
pub use engine::{ComplianceEngine, TransitionOutcome};
pub use record::{EngineRecord, TransitionRecord};
pub use stage::LifecycleStage;
pub use step::{assess, step, Assessment, StepOutcome};
pub use validator::{ComplianceValidator, IssueCode, ValidationIssue, ValidationResult};
