//! Airfield facility types.

use serde::{Deserialize, Serialize};

/// The kind of airfield surface a topology node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    Stand,
    Taxiway,
    Runway,
}

impl FacilityType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stand => "stand",
            Self::Taxiway => "taxiway",
            Self::Runway => "runway",
        }
    }

    /// Node-id prefix used by the topology file (`stand_501`).
    pub fn id_prefix(&self) -> &'static str {
        self.name()
    }

    /// Words that name this facility type in free-form location text.
    pub fn location_words(&self) -> &'static [&'static str] {
        match self {
            Self::Stand => &["停机位", "机位", "stand", "gate", "apron"],
            Self::Taxiway => &["滑行道", "taxiway", "twy"],
            Self::Runway => &["跑道", "runway", "rwy"],
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "stand" | "gate" | "机位" | "停机位" => Some(Self::Stand),
            "taxiway" | "twy" | "滑行道" => Some(Self::Taxiway),
            "runway" | "rwy" | "跑道" => Some(Self::Runway),
            _ => None,
        }
    }

    pub fn all() -> &'static [FacilityType] {
        &[Self::Stand, Self::Taxiway, Self::Runway]
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
