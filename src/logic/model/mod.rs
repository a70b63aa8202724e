//! Model Module - estimators, registry and persisted artifacts
//!
//! The score engine only sees `ModelRegistry`, never how the models were
//! fitted or stored.

pub mod estimator;
pub mod metrics;
pub mod registry;
pub mod storage;

// Re-export common types
pub use estimator::{FitParams, KMeans, LinearRegression, LogisticRegression, SoftmaxRegression};
pub use metrics::Metric;
pub use registry::{
    ModelEntry, ModelKind, ModelMetadata, ModelRegistry, RawOutput, RegistryHandle, TrainedModel,
};
pub use storage::{default_artifact_dir, load_registry, save_registry};
