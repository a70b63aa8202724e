//! HRMS Scoring - personnel feature engineering and scoring pipeline
//!
//! Raw personnel record → validated, versioned 28-column feature vector →
//! model-backed or formula scores, with documented fallbacks when no model
//! is loaded.

pub mod api;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{Result, ScoringError};
pub use logic::config::{FallbackScores, ScoringConfig, TrainingConfig};
pub use logic::features::{CareerVelocity, FeatureBuilder, FeatureVector, Preprocessor};
pub use logic::model::{ModelKind, ModelRegistry, RegistryHandle};
pub use logic::personnel::{LeadershipPotential, PersonnelRecord, Rank, Skills};
pub use logic::scoring::{Insights, ScoreEngine, ScoreKind, ScoreMethod, ScoreResult};
