//! Derived Features
//!
//! Pure functions of the base fields. Every ratio adds 1 to its
//! denominator, so `years_of_service = 0` and `fitness_score = 0` are safe.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults::BaseFeatures;
use super::layout::DERIVED_COUNT;
use crate::error::ScoringError;
use crate::logic::personnel::Rank;

// ============================================================================
// CAREER VELOCITY VARIANTS
// ============================================================================

/// Formula used for `career_velocity`
///
/// The historical training pipeline divided the rank level by tenure while the
/// historical inference path used a constant numerator. One variant is chosen
/// per fitted layout and used for both training and inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerVelocity {
    /// `1 / (years_of_service + 1)`
    #[default]
    Simplified,
    /// `rank_level / (years_of_service + 1)`, simplified form when rank is absent
    RankAdjusted,
}

impl CareerVelocity {
    pub const ALL: [CareerVelocity; 2] = [CareerVelocity::Simplified, CareerVelocity::RankAdjusted];

    pub fn as_str(&self) -> &'static str {
        match self {
            CareerVelocity::Simplified => "simplified",
            CareerVelocity::RankAdjusted => "rank_adjusted",
        }
    }

    pub fn compute(&self, years_of_service: f64, rank: Option<Rank>) -> f64 {
        let numerator = match (self, rank) {
            (CareerVelocity::RankAdjusted, Some(rank)) => f64::from(rank.level()),
            _ => 1.0,
        };
        numerator / (years_of_service + 1.0)
    }
}

impl fmt::Display for CareerVelocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CareerVelocity {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplified" => Ok(CareerVelocity::Simplified),
            "rank_adjusted" | "rank-adjusted" => Ok(CareerVelocity::RankAdjusted),
            other => Err(ScoringError::invalid(
                "career_velocity",
                format!("'{}' is not simplified or rank_adjusted", other),
            )),
        }
    }
}

// ============================================================================
// DERIVED FEATURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub service_efficiency: f64,
    pub stress_fitness_ratio: f64,
    pub leadership_engagement: f64,
    pub performance_consistency: f64,
    pub career_velocity: f64,
}

impl DerivedFeatures {
    pub fn compute(base: &BaseFeatures, rank: Option<Rank>, velocity: CareerVelocity) -> Self {
        Self {
            service_efficiency: service_efficiency(base),
            stress_fitness_ratio: base.stress_index / (base.fitness_score + 1.0),
            leadership_engagement: base.leadership_score * base.engagement_score / 100.0,
            performance_consistency: performance_consistency(base),
            career_velocity: velocity.compute(base.years_of_service, rank),
        }
    }

    /// Values in layout order
    pub fn to_array(&self) -> [f64; DERIVED_COUNT] {
        [
            self.service_efficiency,
            self.stress_fitness_ratio,
            self.leadership_engagement,
            self.performance_consistency,
            self.career_velocity,
        ]
    }
}

pub fn service_efficiency(base: &BaseFeatures) -> f64 {
    base.missions_participated / (base.years_of_service + 1.0)
}

pub fn performance_consistency(base: &BaseFeatures) -> f64 {
    base.peer_review_score * base.mission_success_rate
}
