//! Hazard classification for ramp incidents.

use serde::{Deserialize, Serialize};

/// What kind of hazard an incident presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardClass {
    /// Jet fuel / kerosene / gasoline spill.
    Fuel,
    /// Hydraulic fluid leak.
    Hydraulic,
    /// Engine or lubricating oil.
    Oil,
    /// Foreign object debris.
    Debris,
    /// Bird strike remains on a movement surface.
    BirdStrike,
    /// Anything the parser could not classify.
    Unknown,
}

impl HazardClass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fuel => "FUEL",
            Self::Hydraulic => "HYDRAULIC",
            Self::Oil => "OIL",
            Self::Debris => "DEBRIS",
            Self::BirdStrike => "BIRD_STRIKE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Classify free-form hazard text. Never fails; unrecognized text is
    /// `Unknown`.
    pub fn parse(text: &str) -> Self {
        let t = text.trim().to_lowercase();
        if t.is_empty() {
            return Self::Unknown;
        }
        // Order matters: "hydraulic oil" is hydraulic, "fuel oil" is fuel.
        const HYDRAULIC: &[&str] = &["hydraulic", "skydrol", "液压"];
        const FUEL: &[&str] = &["fuel", "kerosene", "jet a", "jet-a", "avgas", "gasoline", "燃油", "航油", "油料泄漏"];
        const OIL: &[&str] = &["oil", "lubricant", "滑油", "机油", "润滑油"];
        const DEBRIS: &[&str] = &["debris", "fod", "foreign object", "外来物", "异物"];
        const BIRD: &[&str] = &["bird", "wildlife", "鸟击", "鸟"];

        let has = |keys: &[&str]| keys.iter().any(|k| t.contains(k));
        if has(HYDRAULIC) {
            Self::Hydraulic
        } else if has(FUEL) {
            Self::Fuel
        } else if has(OIL) {
            Self::Oil
        } else if has(DEBRIS) {
            Self::Debris
        } else if has(BIRD) {
            Self::BirdStrike
        } else {
            Self::Unknown
        }
    }

    pub fn all() -> &'static [HazardClass] {
        &[
            Self::Fuel,
            Self::Hydraulic,
            Self::Oil,
            Self::Debris,
            Self::BirdStrike,
            Self::Unknown,
        ]
    }
}

impl std::fmt::Display for HazardClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
