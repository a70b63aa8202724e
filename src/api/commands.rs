//! Commands - collaborator API
//!
//! Every command takes plain data (a JSON object for a record, strings for
//! names and paths) and answers `Result<T, String>`. Scoring reads an `Arc`
//! snapshot of the shared registry; reload and training publish a new one.

use std::path::Path;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use super::engine_status::EngineStatus;
use crate::logic::config::ScoringConfig;
use crate::logic::dataset::read_records;
use crate::logic::features::LayoutInfo;
use crate::logic::model::{load_registry, ModelKind, RegistryHandle};
use crate::logic::personnel::PersonnelRecord;
use crate::logic::scoring::{Insights, ScoreEngine, ScoreKind, ScoreResult};
use crate::logic::training::{train_and_persist, TrainingReport};

// ============================================================================
// SHARED STATE
// ============================================================================

static CONFIG: Lazy<ScoringConfig> = Lazy::new(ScoringConfig::from_env);

/// Loaded lazily on first use; missing artifacts mean fallback mode
static REGISTRY: Lazy<RegistryHandle> = Lazy::new(|| {
    log::info!("Loading model artifacts from {}", CONFIG.artifact_dir.display());
    RegistryHandle::new(load_registry(&CONFIG.artifact_dir))
});

pub fn config() -> &'static ScoringConfig {
    &CONFIG
}

fn engine_for(handle: &RegistryHandle, config: &ScoringConfig) -> ScoreEngine {
    ScoreEngine::from_handle(handle, config.fallback.clone())
}

fn parse_record(record: &Map<String, Value>) -> Result<PersonnelRecord, String> {
    PersonnelRecord::from_map(record).map_err(|e| e.to_string())
}

// ============================================================================
// SCORING COMMANDS
// ============================================================================

/// Every score for one record
pub fn score_record(record: Map<String, Value>) -> Result<Insights, String> {
    score_record_with(&REGISTRY, &CONFIG, &record)
}

/// One score by name (`attrition_risk`, `readiness`, ...)
pub fn score(kind: String, record: Map<String, Value>) -> Result<ScoreResult, String> {
    score_with(&REGISTRY, &CONFIG, &kind, &record)
}

/// Feature layout the engine currently expects
pub fn get_layout_info() -> LayoutInfo {
    let velocity = REGISTRY
        .snapshot()
        .preprocessor()
        .map(|p| p.career_velocity)
        .unwrap_or(CONFIG.career_velocity);
    LayoutInfo::current(velocity)
}

pub fn get_engine_status() -> EngineStatus {
    EngineStatus::collect(&REGISTRY.snapshot(), &CONFIG)
}

fn score_record_with(
    handle: &RegistryHandle,
    config: &ScoringConfig,
    record: &Map<String, Value>,
) -> Result<Insights, String> {
    let record = parse_record(record)?;
    engine_for(handle, config)
        .insights(&record)
        .map_err(|e| e.to_string())
}

fn score_with(
    handle: &RegistryHandle,
    config: &ScoringConfig,
    kind: &str,
    record: &Map<String, Value>,
) -> Result<ScoreResult, String> {
    let kind = ScoreKind::from_name(kind).ok_or_else(|| format!("Unknown score kind: {}", kind))?;
    let record = parse_record(record)?;
    let engine = engine_for(handle, config);

    let result = match kind {
        ScoreKind::AttritionRisk => engine.predict_attrition_risk(&record),
        ScoreKind::Readiness => engine.predict_readiness(&record),
        ScoreKind::LeadershipPotential => engine.predict_leadership_potential(&record),
        ScoreKind::CareerTrajectory => engine.predict_career_trajectory(&record),
        ScoreKind::MissionSuitability => engine.predict_mission_suitability(&record),
        ScoreKind::PromotionPotential => engine.promotion_potential(&record),
        ScoreKind::WellnessRisk => engine.predict_wellness_risk(&record),
        ScoreKind::TrainingPriority => engine.predict_training_priority(&record),
    };
    result.map_err(|e| e.to_string())
}

// ============================================================================
// MODEL COMMANDS
// ============================================================================

/// Re-read artifacts from disk; returns the model kinds now loaded
pub fn reload_models() -> Result<Vec<ModelKind>, String> {
    Ok(reload_with(&REGISTRY, &CONFIG.artifact_dir))
}

/// Train on a JSON/JSONL dataset, persist, then publish the new models
pub fn train_from_file(path: String) -> Result<TrainingReport, String> {
    train_with(&REGISTRY, &CONFIG, Path::new(&path))
}

fn reload_with(handle: &RegistryHandle, dir: &Path) -> Vec<ModelKind> {
    let registry = load_registry(dir);
    let kinds = registry.loaded_kinds();
    handle.swap(registry);
    kinds
}

fn train_with(
    handle: &RegistryHandle,
    config: &ScoringConfig,
    path: &Path,
) -> Result<TrainingReport, String> {
    let records = read_records(path).map_err(|e| e.to_string())?;
    let (registry, report) = train_and_persist(&records, config).map_err(|e| e.to_string())?;
    handle.swap(registry);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::{generate, write_records};
    use crate::logic::model::ModelRegistry;
    use crate::logic::scoring::ScoreMethod;
    use serde_json::json;
    use tempfile::tempdir;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn sample() -> Map<String, Value> {
        as_map(json!({
            "id": "IAF-0001",
            "rank": "Squadron Leader",
            "years_of_service": 12,
            "fitness_score": 88,
            "stress_index": 35,
            "mission_success_rate": 0.92,
            "leadership_score": 8.5,
            "peer_review_score": 8.2,
            "engagement_score": 80,
            "skills": "Leadership,Combat Operations"
        }))
    }

    #[test]
    fn test_score_without_models_falls_back() {
        let handle = RegistryHandle::new(ModelRegistry::empty());
        let config = ScoringConfig::default();

        let result = score_with(&handle, &config, "attrition_risk", &sample()).unwrap();
        assert_eq!(result.method, ScoreMethod::Fallback);
        assert_eq!(result.value, 0.3);

        let insights = score_record_with(&handle, &config, &sample()).unwrap();
        assert_eq!(insights.personnel_id, "IAF-0001");
        assert_eq!(insights.skill_cluster, None);
    }

    #[test]
    fn test_unknown_score_kind() {
        let handle = RegistryHandle::default();
        let err = score_with(&handle, &ScoringConfig::default(), "morale", &sample()).unwrap_err();
        assert!(err.contains("morale"));
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let handle = RegistryHandle::default();
        let mut record = sample();
        record.insert("mission_success_rate".into(), json!(1.7));
        // formula-backed scores validate even with no models loaded
        let err = score_with(&handle, &ScoringConfig::default(), "promotion_potential", &record).unwrap_err();
        assert!(err.contains("mission_success_rate"));
    }

    #[test]
    fn test_train_then_reload() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("personnel.json");
        write_records(&data, &generate(60, 3)).unwrap();

        let mut config = ScoringConfig {
            artifact_dir: dir.path().join("artifacts"),
            ..Default::default()
        };
        config.training.epochs = 50;

        let handle = RegistryHandle::default();
        let report = train_with(&handle, &config, &data).unwrap();
        assert_eq!(report.records, 60);
        assert_eq!(handle.snapshot().loaded_kinds().len(), ModelKind::ALL.len());

        let fresh = RegistryHandle::default();
        let kinds = reload_with(&fresh, &config.artifact_dir);
        assert_eq!(kinds, ModelKind::ALL.to_vec());

        let status = EngineStatus::collect(&fresh.snapshot(), &config);
        assert!(status.preprocessor_loaded);
        assert_eq!(status.loaded_count(), ModelKind::ALL.len());
    }
}
