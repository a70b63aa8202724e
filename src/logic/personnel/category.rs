//! Categorical domains
//!
//! Closed domains (rank, leadership potential) are enums. Open domains
//! (branch, unit, ...) stay strings and are only checked against the
//! encoder vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

/// Categorical fields in the order their encodings appear in the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Rank,
    Branch,
    Unit,
    Gender,
    FamilyStatus,
    EducationLevel,
    DeploymentStatus,
    SecurityClearance,
    PerformanceRating,
    LeadershipPotential,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 10] = [
        CategoricalField::Rank,
        CategoricalField::Branch,
        CategoricalField::Unit,
        CategoricalField::Gender,
        CategoricalField::FamilyStatus,
        CategoricalField::EducationLevel,
        CategoricalField::DeploymentStatus,
        CategoricalField::SecurityClearance,
        CategoricalField::PerformanceRating,
        CategoricalField::LeadershipPotential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalField::Rank => "rank",
            CategoricalField::Branch => "branch",
            CategoricalField::Unit => "unit",
            CategoricalField::Gender => "gender",
            CategoricalField::FamilyStatus => "family_status",
            CategoricalField::EducationLevel => "education_level",
            CategoricalField::DeploymentStatus => "deployment_status",
            CategoricalField::SecurityClearance => "security_clearance",
            CategoricalField::PerformanceRating => "performance_rating",
            CategoricalField::LeadershipPotential => "leadership_potential",
        }
    }

    /// Value used when the record does not carry the field
    pub fn default_value(&self) -> &'static str {
        match self {
            CategoricalField::Rank => Rank::FlightLieutenant.as_str(),
            CategoricalField::Branch => "Flying",
            CategoricalField::Unit => "1 Squadron",
            CategoricalField::Gender => "Male",
            CategoricalField::FamilyStatus => "Single",
            CategoricalField::EducationLevel => "Graduate",
            CategoricalField::DeploymentStatus => "Home Base",
            CategoricalField::SecurityClearance => "Confidential",
            CategoricalField::PerformanceRating => "Good",
            CategoricalField::LeadershipPotential => LeadershipPotential::Medium.as_str(),
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RANK
// ============================================================================

/// Commissioned ranks, most junior first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "Pilot Officer")]
    PilotOfficer,
    #[serde(rename = "Flying Officer")]
    FlyingOfficer,
    #[serde(rename = "Flight Lieutenant")]
    FlightLieutenant,
    #[serde(rename = "Squadron Leader")]
    SquadronLeader,
    #[serde(rename = "Wing Commander")]
    WingCommander,
    #[serde(rename = "Group Captain")]
    GroupCaptain,
    #[serde(rename = "Air Commodore")]
    AirCommodore,
    #[serde(rename = "Air Vice Marshal")]
    AirViceMarshal,
    #[serde(rename = "Air Marshal")]
    AirMarshal,
    #[serde(rename = "Air Chief Marshal")]
    AirChiefMarshal,
}

impl Rank {
    pub const ALL: [Rank; 10] = [
        Rank::PilotOfficer,
        Rank::FlyingOfficer,
        Rank::FlightLieutenant,
        Rank::SquadronLeader,
        Rank::WingCommander,
        Rank::GroupCaptain,
        Rank::AirCommodore,
        Rank::AirViceMarshal,
        Rank::AirMarshal,
        Rank::AirChiefMarshal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::PilotOfficer => "Pilot Officer",
            Rank::FlyingOfficer => "Flying Officer",
            Rank::FlightLieutenant => "Flight Lieutenant",
            Rank::SquadronLeader => "Squadron Leader",
            Rank::WingCommander => "Wing Commander",
            Rank::GroupCaptain => "Group Captain",
            Rank::AirCommodore => "Air Commodore",
            Rank::AirViceMarshal => "Air Vice Marshal",
            Rank::AirMarshal => "Air Marshal",
            Rank::AirChiefMarshal => "Air Chief Marshal",
        }
    }

    /// Seniority level, 1 (Pilot Officer) to 10 (Air Chief Marshal)
    pub fn level(&self) -> u8 {
        *self as u8 + 1
    }

    pub fn from_level(level: u8) -> Option<Rank> {
        Rank::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Rank::ALL
            .iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| ScoringError::invalid("rank", format!("'{}' is not a known rank", wanted)))
    }
}

// ============================================================================
// LEADERSHIP POTENTIAL
// ============================================================================

/// Leadership potential, both a feature and the leadership model's label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadershipPotential {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl LeadershipPotential {
    pub const ALL: [LeadershipPotential; 3] = [
        LeadershipPotential::Low,
        LeadershipPotential::Medium,
        LeadershipPotential::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadershipPotential::Low => "low",
            LeadershipPotential::Medium => "medium",
            LeadershipPotential::High => "high",
        }
    }

    /// Class index used by the leadership classifier
    pub fn class_index(&self) -> usize {
        *self as usize
    }

    pub fn from_class_index(index: usize) -> Option<LeadershipPotential> {
        LeadershipPotential::ALL.get(index).copied()
    }
}

impl fmt::Display for LeadershipPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadershipPotential {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(LeadershipPotential::Low),
            "medium" => Ok(LeadershipPotential::Medium),
            "high" => Ok(LeadershipPotential::High),
            other => Err(ScoringError::invalid(
                "leadership_potential",
                format!("'{}' is not one of low/medium/high", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_levels_follow_seniority() {
        assert_eq!(Rank::PilotOfficer.level(), 1);
        assert_eq!(Rank::AirChiefMarshal.level(), 10);
        for pair in Rank::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].level() + 1, pair[1].level());
        }
    }

    #[test]
    fn test_rank_from_level() {
        assert_eq!(Rank::from_level(5), Some(Rank::WingCommander));
        assert_eq!(Rank::from_level(0), None);
        assert_eq!(Rank::from_level(11), None);
    }

    #[test]
    fn test_rank_parse() {
        assert_eq!("Squadron Leader".parse::<Rank>().unwrap(), Rank::SquadronLeader);
        assert_eq!(" air marshal ".parse::<Rank>().unwrap(), Rank::AirMarshal);
        assert!("Ground_Staff".parse::<Rank>().is_err());
    }

    #[test]
    fn test_leadership_parse_is_case_insensitive() {
        assert_eq!("High".parse::<LeadershipPotential>().unwrap(), LeadershipPotential::High);
        assert_eq!("medium".parse::<LeadershipPotential>().unwrap(), LeadershipPotential::Medium);
        assert!("very high".parse::<LeadershipPotential>().is_err());
    }

    #[test]
    fn test_leadership_serde_aliases() {
        let lp: LeadershipPotential = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(lp, LeadershipPotential::Low);
        assert_eq!(serde_json::to_string(&LeadershipPotential::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_field_defaults_are_parseable() {
        assert!(CategoricalField::Rank.default_value().parse::<Rank>().is_ok());
        assert!(CategoricalField::LeadershipPotential
            .default_value()
            .parse::<LeadershipPotential>()
            .is_ok());
    }
}
