//! Base numeric features with the default table applied

use serde::{Deserialize, Serialize};

use super::layout::BASE_COUNT;
use crate::logic::personnel::{NumericField, PersonnelRecord};

// ============================================================================
// DEFAULT TABLE
// ============================================================================

/// Value substituted when a record does not carry the field
pub fn default_numeric(field: NumericField) -> f64 {
    match field {
        NumericField::Age => 30.0,
        NumericField::YearsOfService => 5.0,
        NumericField::FitnessScore => 75.0,
        NumericField::StressIndex => 40.0,
        NumericField::MissionsParticipated => 20.0,
        NumericField::MissionSuccessRate => 0.9,
        NumericField::PeerReviewScore => 7.0,
        NumericField::LeadershipScore => 6.0,
        NumericField::EngagementScore => 75.0,
        NumericField::LeaveRecords => 30.0,
        NumericField::DisciplinaryActions => 0.0,
        NumericField::Complaints => 0.0,
        NumericField::SalaryGrade => 5.0,
    }
}

// ============================================================================
// RESOLVED BASE FEATURES
// ============================================================================

/// Base numeric fields of one record, defaults resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseFeatures {
    pub age: f64,
    pub years_of_service: f64,
    pub fitness_score: f64,
    pub stress_index: f64,
    pub missions_participated: f64,
    pub mission_success_rate: f64,
    pub peer_review_score: f64,
    pub leadership_score: f64,
    pub engagement_score: f64,
    pub leave_records: f64,
    pub disciplinary_actions: f64,
    pub complaints: f64,
    pub salary_grade: f64,
}

impl BaseFeatures {
    pub fn resolve(record: &PersonnelRecord) -> Self {
        let get = |field| record.numeric(field).unwrap_or_else(|| default_numeric(field));
        Self {
            age: get(NumericField::Age),
            years_of_service: get(NumericField::YearsOfService),
            fitness_score: get(NumericField::FitnessScore),
            stress_index: get(NumericField::StressIndex),
            missions_participated: get(NumericField::MissionsParticipated),
            mission_success_rate: get(NumericField::MissionSuccessRate),
            peer_review_score: get(NumericField::PeerReviewScore),
            leadership_score: get(NumericField::LeadershipScore),
            engagement_score: get(NumericField::EngagementScore),
            leave_records: get(NumericField::LeaveRecords),
            disciplinary_actions: get(NumericField::DisciplinaryActions),
            complaints: get(NumericField::Complaints),
            salary_grade: get(NumericField::SalaryGrade),
        }
    }

    /// Values in layout order
    pub fn to_array(&self) -> [f64; BASE_COUNT] {
        [
            self.age,
            self.years_of_service,
            self.fitness_score,
            self.stress_index,
            self.missions_participated,
            self.mission_success_rate,
            self.peer_review_score,
            self.leadership_score,
            self.engagement_score,
            self.leave_records,
            self.disciplinary_actions,
            self.complaints,
            self.salary_grade,
        ]
    }
}

impl Default for BaseFeatures {
    fn default() -> Self {
        Self::resolve(&PersonnelRecord::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_to_empty_record() {
        let base = BaseFeatures::default();
        assert_eq!(base.age, 30.0);
        assert_eq!(base.years_of_service, 5.0);
        assert_eq!(base.mission_success_rate, 0.9);
        assert_eq!(base.salary_grade, 5.0);
    }

    #[test]
    fn test_present_values_win() {
        let record = PersonnelRecord {
            fitness_score: Some(92.0),
            complaints: Some(2.0),
            ..Default::default()
        };
        let base = BaseFeatures::resolve(&record);
        assert_eq!(base.fitness_score, 92.0);
        assert_eq!(base.complaints, 2.0);
        assert_eq!(base.stress_index, 40.0);
    }

    #[test]
    fn test_array_order_matches_fields() {
        let base = BaseFeatures::default();
        let values = base.to_array();
        for (i, field) in NumericField::ALL.iter().enumerate() {
            assert_eq!(values[i], default_numeric(*field));
        }
    }
}
