//! Scoring Configuration
//!
//! Defaults, then an optional JSON file, then `HRMS_*` environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::Result;
use crate::logic::features::CareerVelocity;
use crate::logic::model::{default_artifact_dir, FitParams};
use crate::logic::personnel::LeadershipPotential;

// ============================================================================
// FALLBACK SCORES
// ============================================================================

/// Values returned when a score's model is not loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackScores {
    pub attrition_probability: f64,
    pub readiness_score: f64,
    pub leadership: LeadershipPotential,
    pub promotion_score: f64,
    pub promotion_timeline: String,
    pub mission_suitability: f64,
    pub suitable_missions: Vec<String>,
    pub wellness_probability: f64,
}

impl Default for FallbackScores {
    fn default() -> Self {
        Self {
            attrition_probability: 0.3,
            readiness_score: 75.0,
            leadership: LeadershipPotential::Medium,
            promotion_score: 0.5,
            promotion_timeline: "2-3 years".to_string(),
            mission_suitability: 75.0,
            suitable_missions: vec!["Training".to_string(), "Support".to_string()],
            wellness_probability: 0.0,
        }
    }
}

// ============================================================================
// TRAINING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub seed: u64,
    pub test_fraction: f64,
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub skill_clusters: usize,
    pub kmeans_iterations: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: constants::DEFAULT_SEED,
            test_fraction: constants::DEFAULT_TEST_FRACTION,
            epochs: constants::DEFAULT_EPOCHS,
            learning_rate: 0.1,
            l2: 0.001,
            skill_clusters: 5,
            kmeans_iterations: 100,
        }
    }
}

impl TrainingConfig {
    pub fn fit_params(&self) -> FitParams {
        FitParams {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            l2: self.l2,
        }
    }
}

// ============================================================================
// SCORING CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub artifact_dir: PathBuf,
    pub career_velocity: CareerVelocity,
    pub fallback: FallbackScores,
    pub training: TrainingConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            career_velocity: CareerVelocity::default(),
            fallback: FallbackScores::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let config = serde_json::from_slice(&data)?;
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = constants::get_artifact_dir() {
            self.artifact_dir = PathBuf::from(dir);
        }
        if let Some(raw) = constants::get_career_velocity() {
            match raw.parse() {
                Ok(v) => self.career_velocity = v,
                Err(e) => log::warn!("Ignoring HRMS_CAREER_VELOCITY: {}", e),
            }
        }
        if std::env::var("HRMS_TRAIN_SEED").is_ok() {
            self.training.seed = constants::get_train_seed();
        }
        if std::env::var("HRMS_TRAIN_EPOCHS").is_ok() {
            self.training.epochs = constants::get_train_epochs();
        }
        self
    }
}
