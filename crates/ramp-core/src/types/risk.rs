//! Risk levels, tiers, and the caller's risk assessment.

use serde::{Deserialize, Serialize};

use crate::config::ComplianceConfig;

/// Four-level risk rating. Ordered: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// True for HIGH and CRITICAL.
    pub fn is_high(&self) -> bool {
        *self >= Self::High
    }

    /// Parse a level label: names, `R1`..`R4`, and localized names.
    pub fn parse(text: &str) -> Option<Self> {
        let t = text.trim().to_lowercase();
        match t.as_str() {
            "low" | "l" | "r1" | "minor" | "低" | "低风险" | "一般" => Some(Self::Low),
            "medium" | "moderate" | "med" | "m" | "r2" | "中" | "中风险" | "较大" => {
                Some(Self::Medium)
            }
            "high" | "h" | "r3" | "major" | "高" | "高风险" | "重大" => Some(Self::High),
            "critical" | "severe" | "extreme" | "r4" | "严重" | "极高" | "特别重大" => {
                Some(Self::Critical)
            }
            _ => None,
        }
    }

    pub fn tier(&self) -> RiskTier {
        match self {
            Self::Low => RiskTier::Low,
            Self::Medium => RiskTier::Medium,
            Self::High | Self::Critical => RiskTier::High,
        }
    }

    pub fn all() -> &'static [RiskLevel] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Three-tier risk used by the spatial tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Normalize risk text into a tier. CRITICAL collapses into `High`.
    pub fn parse(text: &str) -> Option<Self> {
        RiskLevel::parse(text).map(|level| level.tier())
    }

    pub fn all() -> &'static [RiskTier] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The risk assessment recorded on a snapshot by the external scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    /// Level label as produced upstream (e.g., "HIGH", "R3").
    pub level: Option<String>,
    /// Numeric score, used when the label is missing or unreadable.
    pub score: Option<f64>,
}

impl RiskAssessment {
    pub fn with_level(level: RiskLevel) -> Self {
        Self {
            level: Some(level.name().to_string()),
            score: None,
        }
    }

    /// Resolve the effective level: the label wins, the score is the fallback.
    pub fn resolve_level(&self, config: &ComplianceConfig) -> Option<RiskLevel> {
        self.level
            .as_deref()
            .and_then(RiskLevel::parse)
            .or_else(|| self.score.map(|s| config.level_for_score(s)))
    }
}
