//! Closed-form scores
//!
//! The readiness weighting also labels the training data, so changing any
//! weight here changes ground truth.

use crate::logic::features::derived::performance_consistency;
use crate::logic::features::BaseFeatures;

/// Composite 0-100 readiness index
pub fn readiness_score(b: &BaseFeatures) -> f64 {
    0.25 * b.fitness_score
        + 0.20 * (100.0 - b.stress_index)
        + 0.25 * (b.mission_success_rate * 100.0)
        + 0.20 * b.engagement_score
        + 0.10 * (b.leadership_score * 10.0)
}

pub fn mission_suitability(b: &BaseFeatures, readiness: f64) -> f64 {
    0.25 * b.fitness_score
        + 0.20 * (100.0 - b.stress_index)
        + 0.30 * (b.mission_success_rate * 100.0)
        + 0.15 * readiness
        + 0.10 * (b.leadership_score * 10.0)
}

pub fn promotion_potential(b: &BaseFeatures) -> f64 {
    (0.30 * b.leadership_score
        + 0.25 * performance_consistency(b)
        + 0.20 * b.engagement_score
        + 0.15 * (100.0 - b.stress_index)
        + 0.10 * b.fitness_score)
        / 100.0
}

pub fn wellness_risk_flag(b: &BaseFeatures) -> u8 {
    u8::from(b.stress_index > 70.0 || b.fitness_score < 60.0 || b.engagement_score < 50.0)
}

pub fn training_priority_flag(b: &BaseFeatures, readiness: f64) -> u8 {
    u8::from(readiness < 75.0 || b.fitness_score < 70.0 || b.stress_index > 60.0)
}

// ============================================================================
// ATTRITION GROUND TRUTH
// ============================================================================

/// Additive risk points used only to label generated data
pub fn attrition_risk_points(b: &BaseFeatures) -> u32 {
    let mut points = 0;
    if b.engagement_score < 60.0 {
        points += 30;
    }
    if b.years_of_service > 25.0 {
        points += 25;
    }
    if b.disciplinary_actions > 1.0 {
        points += 20;
    }
    if b.stress_index > 65.0 {
        points += 15;
    }
    if b.fitness_score < 70.0 {
        points += 10;
    }
    points
}

/// At risk only when the points exceed 40 and the independent draw exceeds 0.6
pub fn attrition_label(points: u32, draw: f64) -> bool {
    points > 40 && draw > 0.6
}
