//! Numeric fields and their domains

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base numeric fields in feature-vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Age,
    YearsOfService,
    FitnessScore,
    StressIndex,
    MissionsParticipated,
    MissionSuccessRate,
    PeerReviewScore,
    LeadershipScore,
    EngagementScore,
    LeaveRecords,
    DisciplinaryActions,
    Complaints,
    SalaryGrade,
}

impl NumericField {
    pub const ALL: [NumericField; 13] = [
        NumericField::Age,
        NumericField::YearsOfService,
        NumericField::FitnessScore,
        NumericField::StressIndex,
        NumericField::MissionsParticipated,
        NumericField::MissionSuccessRate,
        NumericField::PeerReviewScore,
        NumericField::LeadershipScore,
        NumericField::EngagementScore,
        NumericField::LeaveRecords,
        NumericField::DisciplinaryActions,
        NumericField::Complaints,
        NumericField::SalaryGrade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericField::Age => "age",
            NumericField::YearsOfService => "years_of_service",
            NumericField::FitnessScore => "fitness_score",
            NumericField::StressIndex => "stress_index",
            NumericField::MissionsParticipated => "missions_participated",
            NumericField::MissionSuccessRate => "mission_success_rate",
            NumericField::PeerReviewScore => "peer_review_score",
            NumericField::LeadershipScore => "leadership_score",
            NumericField::EngagementScore => "engagement_score",
            NumericField::LeaveRecords => "leave_records",
            NumericField::DisciplinaryActions => "disciplinary_actions",
            NumericField::Complaints => "complaints",
            NumericField::SalaryGrade => "salary_grade",
        }
    }

    /// Inclusive domain `(min, max)`; `None` for an open upper bound
    pub fn domain(&self) -> (f64, Option<f64>) {
        match self {
            NumericField::FitnessScore
            | NumericField::StressIndex
            | NumericField::EngagementScore => (0.0, Some(100.0)),
            NumericField::MissionSuccessRate => (0.0, Some(1.0)),
            NumericField::PeerReviewScore
            | NumericField::LeadershipScore
            | NumericField::SalaryGrade => (1.0, Some(10.0)),
            NumericField::Age
            | NumericField::YearsOfService
            | NumericField::MissionsParticipated
            | NumericField::LeaveRecords
            | NumericField::DisciplinaryActions
            | NumericField::Complaints => (0.0, None),
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
