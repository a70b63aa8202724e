//! Model Registry - fitted preprocessor + trained models
//!
//! A registry is immutable once built. Retraining builds a new one and
//! publishes it through `RegistryHandle::swap`, so readers never see a
//! half-updated vocabulary or model set.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::ArrayView1;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::estimator::{KMeans, LinearRegression, LogisticRegression, SoftmaxRegression};
use super::metrics::Metric;
use crate::error::Result;
use crate::logic::features::Preprocessor;

// ============================================================================
// MODEL KINDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Attrition,
    Readiness,
    Leadership,
    CareerTrajectory,
    MissionOptimization,
    Wellness,
    TrainingNeeds,
    SkillClustering,
}

impl ModelKind {
    pub const ALL: [ModelKind; 8] = [
        ModelKind::Attrition,
        ModelKind::Readiness,
        ModelKind::Leadership,
        ModelKind::CareerTrajectory,
        ModelKind::MissionOptimization,
        ModelKind::Wellness,
        ModelKind::TrainingNeeds,
        ModelKind::SkillClustering,
    ];

    /// Stable artifact name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Attrition => "attrition",
            ModelKind::Readiness => "readiness",
            ModelKind::Leadership => "leadership",
            ModelKind::CareerTrajectory => "career_trajectory",
            ModelKind::MissionOptimization => "mission_optimization",
            ModelKind::Wellness => "wellness",
            ModelKind::TrainingNeeds => "training_needs",
            ModelKind::SkillClustering => "skill_clustering",
        }
    }

    pub fn from_name(name: &str) -> Option<ModelKind> {
        ModelKind::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Whether the model consumes the scaled feature vector
    /// (skill clustering reads the skill one-hot vector instead)
    pub fn uses_feature_vector(&self) -> bool {
        !matches!(self, ModelKind::SkillClustering)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TRAINED MODELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "estimator", rename_all = "snake_case")]
pub enum TrainedModel {
    Logistic(LogisticRegression),
    Softmax(SoftmaxRegression),
    Linear(LinearRegression),
    KMeans(KMeans),
}

/// Raw model output, before any post-processing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawOutput {
    Probability(f64),
    Value(f64),
    Class { index: usize, probabilities: Vec<f64> },
    Cluster(usize),
}

impl TrainedModel {
    pub fn predict(&self, row: ArrayView1<f64>) -> Result<RawOutput> {
        Ok(match self {
            TrainedModel::Logistic(m) => RawOutput::Probability(m.predict_proba(row)?),
            TrainedModel::Softmax(m) => {
                let (index, probabilities) = m.predict(row)?;
                RawOutput::Class {
                    index,
                    probabilities,
                }
            }
            TrainedModel::Linear(m) => RawOutput::Value(m.predict(row)?),
            TrainedModel::KMeans(m) => RawOutput::Cluster(m.predict(row)?),
        })
    }

    pub fn estimator_name(&self) -> &'static str {
        match self {
            TrainedModel::Logistic(_) => "logistic_regression",
            TrainedModel::Softmax(_) => "softmax_regression",
            TrainedModel::Linear(_) => "linear_regression",
            TrainedModel::KMeans(_) => "k_means",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub kind: ModelKind,
    pub run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub training_records: usize,
    pub metric: Option<Metric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub metadata: ModelMetadata,
    pub model: TrainedModel,
}

impl ModelEntry {
    pub fn new(
        kind: ModelKind,
        run_id: Uuid,
        model: TrainedModel,
        training_records: usize,
        metric: Option<Metric>,
    ) -> Self {
        Self {
            metadata: ModelMetadata {
                kind,
                run_id,
                trained_at: Utc::now(),
                training_records,
                metric,
            },
            model,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.metadata.kind
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    preprocessor: Option<Preprocessor>,
    models: BTreeMap<ModelKind, ModelEntry>,
}

impl ModelRegistry {
    /// No preprocessor, no models: every score runs in fallback mode
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(preprocessor: Option<Preprocessor>) -> Self {
        Self {
            preprocessor,
            models: BTreeMap::new(),
        }
    }

    pub fn with_model(mut self, entry: ModelEntry) -> Self {
        self.models.insert(entry.kind(), entry);
        self
    }

    pub fn preprocessor(&self) -> Option<&Preprocessor> {
        self.preprocessor.as_ref()
    }

    pub fn entry(&self, kind: ModelKind) -> Option<&ModelEntry> {
        self.models.get(&kind)
    }

    /// The model for `kind`, if it can actually run.
    /// Feature-vector models also need the preprocessor.
    pub fn model(&self, kind: ModelKind) -> Option<&TrainedModel> {
        if kind.uses_feature_vector() && self.preprocessor.is_none() {
            return None;
        }
        self.models.get(&kind).map(|e| &e.model)
    }

    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.model(kind).is_some()
    }

    pub fn loaded_kinds(&self) -> Vec<ModelKind> {
        ModelKind::ALL.into_iter().filter(|k| self.is_loaded(*k)).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModelEntry> {
        self.models.values()
    }
}

// ============================================================================
// SHARED HANDLE
// ============================================================================

/// Read-mostly handle: readers clone an `Arc`, writers swap it
#[derive(Debug, Default)]
pub struct RegistryHandle {
    current: RwLock<Arc<ModelRegistry>>,
}

impl RegistryHandle {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.current.read())
    }

    /// Publish a new registry, returning the previous one
    pub fn swap(&self, registry: ModelRegistry) -> Arc<ModelRegistry> {
        let next = Arc::new(registry);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        log::info!(
            "Model registry swapped: {} model(s) now loaded",
            self.current.read().loaded_kinds().len()
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::CareerVelocity;
    use crate::logic::personnel::PersonnelRecord;
    use ndarray::array;

    fn constant_model() -> TrainedModel {
        TrainedModel::Linear(LinearRegression {
            weights: array![0.0, 0.0],
            bias: 42.0,
        })
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::fit(&[PersonnelRecord::new("1", "A")], CareerVelocity::Simplified).unwrap()
    }

    #[test]
    fn test_model_kind_names_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ModelKind::from_name("mission_readiness"), None);
    }

    #[test]
    fn test_feature_models_need_preprocessor() {
        let entry = ModelEntry::new(ModelKind::Readiness, Uuid::new_v4(), constant_model(), 10, None);
        let registry = ModelRegistry::empty().with_model(entry.clone());
        assert!(!registry.is_loaded(ModelKind::Readiness));

        let registry = ModelRegistry::new(Some(preprocessor())).with_model(entry);
        assert!(registry.is_loaded(ModelKind::Readiness));
        assert_eq!(registry.loaded_kinds(), vec![ModelKind::Readiness]);
    }

    #[test]
    fn test_raw_output() {
        let out = constant_model().predict(array![1.0, 2.0].view()).unwrap();
        assert_eq!(out, RawOutput::Value(42.0));
    }

    #[test]
    fn test_handle_swap_keeps_old_snapshots() {
        let handle = RegistryHandle::new(ModelRegistry::empty());
        let before = handle.snapshot();

        let entry = ModelEntry::new(ModelKind::Readiness, Uuid::new_v4(), constant_model(), 10, None);
        let previous = handle.swap(ModelRegistry::new(Some(preprocessor())).with_model(entry));

        assert!(Arc::ptr_eq(&before, &previous));
        assert!(before.loaded_kinds().is_empty());
        assert!(handle.snapshot().is_loaded(ModelKind::Readiness));
    }
}
