//! Lifecycle stages and the static transition table.

use serde::{Deserialize, Serialize};

/// One discrete phase of incident handling, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleStage {
    #[serde(rename = "INIT")]
    Init,
    #[serde(rename = "P1_RISK_ASSESS")]
    RiskAssessment,
    #[serde(rename = "P2_IMMEDIATE_CONTROL")]
    ImmediateControl,
    #[serde(rename = "P3_RESOURCE_DISPATCH")]
    ResourceDispatch,
    #[serde(rename = "P4_AREA_ISOLATION")]
    AreaIsolation,
    #[serde(rename = "P5_CLEANUP")]
    Cleanup,
    #[serde(rename = "P6_VERIFICATION")]
    Verification,
    #[serde(rename = "P7_RECOVERY")]
    Recovery,
    /// Pre-closure: every fact is in, awaiting the final report.
    #[serde(rename = "P8_CLOSE")]
    Closure,
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl LifecycleStage {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::RiskAssessment => "P1_RISK_ASSESS",
            Self::ImmediateControl => "P2_IMMEDIATE_CONTROL",
            Self::ResourceDispatch => "P3_RESOURCE_DISPATCH",
            Self::AreaIsolation => "P4_AREA_ISOLATION",
            Self::Cleanup => "P5_CLEANUP",
            Self::Verification => "P6_VERIFICATION",
            Self::Recovery => "P7_RECOVERY",
            Self::Closure => "P8_CLOSE",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Init => "Collecting incident facts",
            Self::RiskAssessment => "Assessing risk",
            Self::ImmediateControl => "Immediate control of a high-risk hazard",
            Self::ResourceDispatch => "Dispatching response resources",
            Self::AreaIsolation => "Isolating the affected area",
            Self::Cleanup => "Cleaning up the hazard",
            Self::Verification => "Verifying the surface is safe",
            Self::Recovery => "Recovering normal operations",
            Self::Closure => "Ready to close, awaiting final report",
            Self::Completed => "Incident closed",
        }
    }

    /// Parse a stage id. Accepts canonical ids and their lower-case forms.
    pub fn parse(text: &str) -> Option<Self> {
        let t = text.trim().to_uppercase();
        Self::all().iter().copied().find(|s| s.id() == t)
    }

    /// Position in the canonical ordering, 0 for `Init`.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Legal successors. Terminal stages have none.
    pub fn next_stages(&self) -> &'static [LifecycleStage] {
        use LifecycleStage::*;
        match self {
            Init => &[RiskAssessment],
            RiskAssessment => &[ImmediateControl, ResourceDispatch, AreaIsolation],
            ImmediateControl => &[ResourceDispatch, AreaIsolation],
            ResourceDispatch => &[AreaIsolation],
            AreaIsolation => &[Cleanup, Closure],
            Cleanup => &[Verification],
            Verification => &[Cleanup, Recovery],
            Recovery => &[Closure],
            Closure => &[Completed],
            Completed => &[],
        }
    }

    pub fn can_transition_to(&self, to: LifecycleStage) -> bool {
        self.next_stages().contains(&to)
    }

    pub fn all() -> &'static [LifecycleStage] {
        use LifecycleStage::*;
        &[
            Init,
            RiskAssessment,
            ImmediateControl,
            ResourceDispatch,
            AreaIsolation,
            Cleanup,
            Verification,
            Recovery,
            Closure,
            Completed,
        ]
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
