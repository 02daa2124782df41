//! Compliance engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CRITICAL_SCORE_THRESHOLD, DEFAULT_FIRE_NOTIFICATION_ACTION,
    DEFAULT_HIGH_SCORE_THRESHOLD, DEFAULT_MEDIUM_SCORE_THRESHOLD,
};
use crate::types::RiskLevel;

/// Configuration for stage inference and validation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Mandatory action id that records fire department notification.
    /// Default: `notify_fire_dept`.
    pub fire_notification_action: Option<String>,
    /// Score at or above which an unlabelled assessment is MEDIUM. Default: 30.
    pub medium_score_threshold: Option<f64>,
    /// Score at or above which an unlabelled assessment is HIGH. Default: 60.
    pub high_score_threshold: Option<f64>,
    /// Score at or above which an unlabelled assessment is CRITICAL. Default: 85.
    pub critical_score_threshold: Option<f64>,
}

impl ComplianceConfig {
    pub fn effective_fire_notification_action(&self) -> &str {
        self.fire_notification_action
            .as_deref()
            .unwrap_or(DEFAULT_FIRE_NOTIFICATION_ACTION)
    }

    pub fn effective_medium_score_threshold(&self) -> f64 {
        self.medium_score_threshold.unwrap_or(DEFAULT_MEDIUM_SCORE_THRESHOLD)
    }

    pub fn effective_high_score_threshold(&self) -> f64 {
        self.high_score_threshold.unwrap_or(DEFAULT_HIGH_SCORE_THRESHOLD)
    }

    pub fn effective_critical_score_threshold(&self) -> f64 {
        self.critical_score_threshold
            .unwrap_or(DEFAULT_CRITICAL_SCORE_THRESHOLD)
    }

    /// Map a numeric risk score onto a level using the configured thresholds.
    pub fn level_for_score(&self, score: f64) -> RiskLevel {
        if score >= self.effective_critical_score_threshold() {
            RiskLevel::Critical
        } else if score >= self.effective_high_score_threshold() {
            RiskLevel::High
        } else if score >= self.effective_medium_score_threshold() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
