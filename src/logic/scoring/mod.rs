//! Scoring Module - feature vector / raw record → ScoreResult
//!
//! # Architecture
//! - `formulas.rs`: closed-form weighted sums and ground-truth rules
//! - `rules.rs`: thresholds mapping raw values to category labels
//! - `advice.rs`: factors, recommendations and skill gaps
//! - `types.rs`: `ScoreResult`, `ScoreMethod`, `Insights`
//! - `engine.rs`: `ScoreEngine`, model first, fallback constant otherwise

pub mod advice;
pub mod engine;
pub mod formulas;
pub mod rules;
pub mod types;


pub use engine::ScoreEngine;
pub use rules::{ReadinessCategory, RiskLevel};
pub use types::{
    Insights, Priority, ScoreKind, ScoreMethod, ScoreResult, SkillGap, TrainingRecommendation,
};
