//! Qualitative rule tables
//!
//! Threshold rules on the resolved base fields. These never consult a model.

use std::collections::BTreeMap;

use super::rules::{mission_suitability_level, RiskLevel};
use super::types::{Priority, SkillGap, TrainingRecommendation};
use crate::logic::features::BaseFeatures;
use crate::logic::personnel::{Rank, Skills};

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn attrition_factors(b: &BaseFeatures) -> Vec<String> {
    let mut factors = Vec::new();
    if b.stress_index > 70.0 {
        factors.push("High stress levels".to_string());
    }
    if b.engagement_score < 50.0 {
        factors.push("Low engagement".to_string());
    }
    if b.years_of_service > 20.0 {
        factors.push("Long service tenure".to_string());
    }
    factors
}

pub fn readiness_recommendations(score: f64) -> Vec<String> {
    if score < 60.0 {
        owned(&["Intensive training required", "Medical evaluation", "Stress assessment"])
    } else if score < 80.0 {
        owned(&["Additional training", "Fitness improvement", "Skill development"])
    } else {
        owned(&["Maintain current standards", "Advanced training opportunities"])
    }
}

pub fn leadership_development_areas(b: &BaseFeatures) -> Vec<String> {
    let mut areas = Vec::new();
    if b.peer_review_score < 7.0 {
        areas.push("Team collaboration".to_string());
    }
    if b.mission_success_rate < 0.8 {
        areas.push("Decision making under pressure".to_string());
    }
    areas
}

pub fn career_development_needs(b: &BaseFeatures) -> Vec<String> {
    let mut needs = Vec::new();
    if b.leadership_score < 7.0 {
        needs.push("Leadership training".to_string());
    }
    if b.engagement_score < 70.0 {
        needs.push("Motivation enhancement".to_string());
    }
    needs
}

pub fn mission_recommendations(score: f64) -> Vec<String> {
    match mission_suitability_level(score) {
        RiskLevel::High => owned(&["Combat missions", "Leadership roles", "Critical operations"]),
        RiskLevel::Medium => owned(&["Support missions", "Training roles", "Administrative tasks"]),
        RiskLevel::Low => owned(&["Ground duties", "Training programs", "Administrative support"]),
    }
}

/// Physical, mental, experience and leadership sub-scores on a 0-100 scale
pub fn mission_readiness_factors(b: &BaseFeatures) -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("physical".to_string(), b.fitness_score),
        ("mental".to_string(), 100.0 - b.stress_index),
        ("experience".to_string(), (b.missions_participated * 5.0).min(100.0)),
        ("leadership".to_string(), b.leadership_score * 10.0),
    ])
}

pub fn wellness_recommendations(level: RiskLevel) -> Vec<String> {
    match level {
        RiskLevel::High => owned(&["Immediate counseling", "Stress management program", "Workload adjustment"]),
        RiskLevel::Medium => owned(&["Regular check-ins", "Wellness activities", "Work-life balance"]),
        RiskLevel::Low => owned(&["Maintain current wellness practices", "Preventive care"]),
    }
}

pub fn training_recommendations(b: &BaseFeatures) -> Vec<TrainingRecommendation> {
    let mut out = Vec::new();
    if b.fitness_score < 70.0 {
        out.push(TrainingRecommendation {
            kind: "Physical Fitness".to_string(),
            priority: Priority::High,
            description: "Intensive fitness program required".to_string(),
        });
    }
    if b.stress_index > 60.0 {
        out.push(TrainingRecommendation {
            kind: "Stress Management".to_string(),
            priority: Priority::High,
            description: "Stress reduction and coping strategies".to_string(),
        });
    }
    if b.leadership_score < 7.0 {
        out.push(TrainingRecommendation {
            kind: "Leadership Development".to_string(),
            priority: Priority::Medium,
            description: "Leadership skills enhancement program".to_string(),
        });
    }
    out
}

// ============================================================================
// SKILL GAPS
// ============================================================================

pub fn required_skills(rank: Rank) -> &'static [&'static str] {
    match rank {
        Rank::PilotOfficer => &["Basic Flying", "Safety Protocols"],
        Rank::FlyingOfficer => &["Advanced Flying", "Navigation", "Communication"],
        Rank::FlightLieutenant => &["Leadership", "Mission Planning", "Team Management"],
        Rank::SquadronLeader => &["Strategic Planning", "Advanced Leadership", "Training"],
        Rank::WingCommander => &["Operations Management", "Strategic Leadership", "Policy Development"],
        _ => &["Leadership", "Technical Skills"],
    }
}

fn skill_priority(skill: &str) -> Priority {
    match skill {
        "Leadership" | "Strategic Planning" => Priority::High,
        "Technical Skills" | "Communication" => Priority::Medium,
        _ => Priority::Low,
    }
}

fn training_program(skill: &str) -> String {
    match skill {
        "Leadership" => "Advanced Leadership Development Program".to_string(),
        "Strategic Planning" => "Strategic Management Course".to_string(),
        "Technical Skills" => "Technical Certification Program".to_string(),
        "Communication" => "Effective Communication Workshop".to_string(),
        other => format!("{} Training Program", other),
    }
}

/// Skills the rank requires that the record does not list
pub fn skill_gaps(rank: Rank, skills: &Skills) -> SkillGap {
    let missing: Vec<String> = required_skills(rank)
        .iter()
        .filter(|s| !skills.contains(s))
        .map(|s| s.to_string())
        .collect();

    SkillGap {
        development_priority: missing.iter().map(|s| (s.clone(), skill_priority(s))).collect(),
        training_programs: missing.iter().map(|s| training_program(s)).collect(),
        missing_skills: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrition_factors() {
        let b = BaseFeatures {
            stress_index: 80.0,
            engagement_score: 40.0,
            years_of_service: 22.0,
            ..BaseFeatures::default()
        };
        assert_eq!(
            attrition_factors(&b),
            vec!["High stress levels", "Low engagement", "Long service tenure"]
        );
        assert!(attrition_factors(&BaseFeatures::default()).is_empty());
    }

    #[test]
    fn test_readiness_recommendation_bands() {
        assert_eq!(readiness_recommendations(55.0)[0], "Intensive training required");
        assert_eq!(readiness_recommendations(60.0)[0], "Additional training");
        assert_eq!(readiness_recommendations(80.0)[0], "Maintain current standards");
    }

    #[test]
    fn test_mission_readiness_factors() {
        let b = BaseFeatures {
            missions_participated: 30.0,
            ..BaseFeatures::default()
        };
        let factors = mission_readiness_factors(&b);
        assert_eq!(factors["physical"], 75.0);
        assert_eq!(factors["mental"], 60.0);
        assert_eq!(factors["experience"], 100.0);
        assert_eq!(factors["leadership"], 60.0);
    }

    #[test]
    fn test_training_recommendations_on_defaults() {
        let recs = training_recommendations(&BaseFeatures::default());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, "Leadership Development");
        assert_eq!(recs[0].priority, Priority::Medium);
    }

    #[test]
    fn test_skill_gaps() {
        let skills = Skills::parse("Leadership,Avionics");
        let gap = skill_gaps(Rank::FlightLieutenant, &skills);
        assert_eq!(gap.missing_skills, vec!["Mission Planning", "Team Management"]);
        assert_eq!(gap.training_programs[0], "Mission Planning Training Program");
        assert!(gap.development_priority.iter().all(|(_, p)| *p == Priority::Low));

        let gap = skill_gaps(Rank::AirMarshal, &Skills::new());
        assert_eq!(gap.missing_skills, vec!["Leadership", "Technical Skills"]);
        assert_eq!(
            gap.development_priority,
            vec![
                ("Leadership".to_string(), Priority::High),
                ("Technical Skills".to_string(), Priority::Medium)
            ]
        );
        assert_eq!(gap.training_programs[0], "Advanced Leadership Development Program");
    }
}
