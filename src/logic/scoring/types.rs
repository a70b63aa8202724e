//! Score result types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    AttritionRisk,
    Readiness,
    LeadershipPotential,
    CareerTrajectory,
    MissionSuitability,
    PromotionPotential,
    WellnessRisk,
    TrainingPriority,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 8] = [
        ScoreKind::AttritionRisk,
        ScoreKind::Readiness,
        ScoreKind::LeadershipPotential,
        ScoreKind::CareerTrajectory,
        ScoreKind::MissionSuitability,
        ScoreKind::PromotionPotential,
        ScoreKind::WellnessRisk,
        ScoreKind::TrainingPriority,
    ];

    pub fn from_name(name: &str) -> Option<ScoreKind> {
        let wanted = name.trim();
        ScoreKind::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(wanted))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreKind::AttritionRisk => "attrition_risk",
            ScoreKind::Readiness => "readiness",
            ScoreKind::LeadershipPotential => "leadership_potential",
            ScoreKind::CareerTrajectory => "career_trajectory",
            ScoreKind::MissionSuitability => "mission_suitability",
            ScoreKind::PromotionPotential => "promotion_potential",
            ScoreKind::WellnessRisk => "wellness_risk",
            ScoreKind::TrainingPriority => "training_priority",
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a score was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    Model,
    Formula,
    /// Model not loaded; documented constant returned
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub kind: ScoreKind,
    pub value: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub breakdown: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    pub method: ScoreMethod,
}

impl ScoreResult {
    pub fn new(kind: ScoreKind, value: f64, category: impl Into<String>, method: ScoreMethod) -> Self {
        Self {
            kind,
            value,
            category: category.into(),
            factors: Vec::new(),
            recommendations: Vec::new(),
            breakdown: BTreeMap::new(),
            timeline: None,
            method,
        }
    }

    pub fn with_factors(mut self, factors: Vec<String>) -> Self {
        self.factors = factors;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_breakdown(mut self, breakdown: BTreeMap<String, f64>) -> Self {
        self.breakdown = breakdown;
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = Some(timeline.into());
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.method == ScoreMethod::Fallback
    }
}

// ============================================================================
// ADVICE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillGap {
    pub missing_skills: Vec<String>,
    pub development_priority: Vec<(String, Priority)>,
    pub training_programs: Vec<String>,
}

/// Every score for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub personnel_id: String,
    pub attrition_risk: ScoreResult,
    pub readiness: ScoreResult,
    pub leadership_potential: ScoreResult,
    pub career_trajectory: ScoreResult,
    pub mission_suitability: ScoreResult,
    pub wellness_risk: ScoreResult,
    pub training_priority: ScoreResult,
    pub recommended_training: Vec<TrainingRecommendation>,
    pub skill_gaps: SkillGap,
    pub skill_cluster: Option<usize>,
}
