//! Post-processing rules: raw value → category label

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLDS
// ============================================================================

pub const ATTRITION_MEDIUM: f64 = 0.3;
pub const ATTRITION_HIGH: f64 = 0.6;

pub const READINESS_EXCELLENT: f64 = 85.0;
pub const READINESS_GOOD: f64 = 70.0;

pub const WELLNESS_HIGH: f64 = 0.7;
pub const WELLNESS_MEDIUM: f64 = 0.4;

pub const MISSION_HIGH: f64 = 80.0;
pub const MISSION_MEDIUM: f64 = 60.0;

/// Training-needs probability at or above which training is a priority
pub const TRAINING_PRIORITY: f64 = 0.5;

pub const PROMOTION_FAST: f64 = 0.8;
pub const PROMOTION_FAST_MIN_SERVICE: f64 = 3.0;
pub const PROMOTION_STEADY: f64 = 0.6;

// ============================================================================
// LABELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessCategory {
    Excellent,
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl ReadinessCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessCategory::Excellent => "Excellent",
            ReadinessCategory::Good => "Good",
            ReadinessCategory::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ReadinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULES
// ============================================================================

pub fn attrition_risk_level(probability: f64) -> RiskLevel {
    if probability < ATTRITION_MEDIUM {
        RiskLevel::Low
    } else if probability < ATTRITION_HIGH {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn clamp_readiness(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

pub fn readiness_category(score: f64) -> ReadinessCategory {
    if score > READINESS_EXCELLENT {
        ReadinessCategory::Excellent
    } else if score > READINESS_GOOD {
        ReadinessCategory::Good
    } else {
        ReadinessCategory::NeedsImprovement
    }
}

pub fn wellness_risk_level(probability: f64) -> RiskLevel {
    if probability > WELLNESS_HIGH {
        RiskLevel::High
    } else if probability > WELLNESS_MEDIUM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Suitability band used to pick mission recommendations
pub fn mission_suitability_level(score: f64) -> RiskLevel {
    if score > MISSION_HIGH {
        RiskLevel::High
    } else if score > MISSION_MEDIUM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn training_priority_level(probability: f64) -> RiskLevel {
    if probability >= TRAINING_PRIORITY {
        RiskLevel::High
    } else {
        RiskLevel::Low
    }
}

pub fn promotion_timeline(score: f64, years_of_service: f64) -> &'static str {
    if score > PROMOTION_FAST && years_of_service >= PROMOTION_FAST_MIN_SERVICE {
        "1-2 years"
    } else if score > PROMOTION_STEADY {
        "2-4 years"
    } else {
        "4+ years"
    }
}

pub fn leadership_timeline(leadership_score: f64) -> &'static str {
    if leadership_score >= 8.0 {
        "6-12 months"
    } else if leadership_score >= 6.0 {
        "1-2 years"
    } else {
        "2-3 years"
    }
}
