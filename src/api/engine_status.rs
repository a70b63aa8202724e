use serde::{Serialize, Deserialize};

use crate::logic::config::ScoringConfig;
use crate::logic::features::{layout_hash, CareerVelocity, FEATURE_COUNT, FEATURE_VERSION};
use crate::logic::model::{Metric, ModelKind, ModelRegistry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_count: usize,
    pub career_velocity: CareerVelocity,

    pub artifact_dir: String,
    pub preprocessor_loaded: bool,
    pub models: Vec<ModelStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub kind: ModelKind,
    pub loaded: bool,
    pub estimator: Option<String>, // "logistic_regression" | "softmax_regression" | ...
    pub run_id: Option<String>,
    pub trained_at: Option<String>,
    pub trained_on_records: Option<usize>,
    pub metric: Option<Metric>,
}

impl EngineStatus {
    /// Snapshot of what the engine would score with right now
    pub fn collect(registry: &ModelRegistry, config: &ScoringConfig) -> Self {
        let pre = registry.preprocessor();
        let career_velocity = pre.map(|p| p.career_velocity).unwrap_or(config.career_velocity);

        let models = ModelKind::ALL
            .into_iter()
            .map(|kind| {
                let entry = registry.entry(kind);
                ModelStatus {
                    kind,
                    loaded: registry.is_loaded(kind),
                    estimator: entry.map(|e| e.model.estimator_name().to_string()),
                    run_id: entry.map(|e| e.metadata.run_id.to_string()),
                    trained_at: entry.map(|e| e.metadata.trained_at.to_rfc3339()),
                    trained_on_records: entry.map(|e| e.metadata.training_records),
                    metric: entry.and_then(|e| e.metadata.metric),
                }
            })
            .collect();

        Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(career_velocity),
            feature_count: FEATURE_COUNT,
            career_velocity,
            artifact_dir: config.artifact_dir.display().to_string(),
            preprocessor_loaded: pre.is_some(),
            models,
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.models.iter().filter(|m| m.loaded).count()
    }
}
