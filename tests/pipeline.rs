//! End-to-end: generate → train → persist → load → score

use std::sync::Arc;

use hrms_scoring::logic::dataset::{generate, read_records, write_records};
use hrms_scoring::logic::model::load_registry;
use hrms_scoring::logic::training::train_and_persist;
use hrms_scoring::{
    CareerVelocity, ModelKind, ModelRegistry, PersonnelRecord, ScoreEngine, ScoreMethod, ScoringConfig,
    ScoringError,
};
use tempfile::tempdir;

fn config_in(dir: &std::path::Path) -> ScoringConfig {
    let mut config = ScoringConfig {
        artifact_dir: dir.join("artifacts"),
        ..Default::default()
    };
    config.training.epochs = 80;
    config
}

#[test]
fn pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("personnel.jsonl");
    write_records(&data, &generate(120, 42)).unwrap();

    let records = read_records(&data).unwrap();
    assert_eq!(records.len(), 120);

    let config = config_in(dir.path());
    let (trained, report) = train_and_persist(&records, &config).unwrap();
    assert_eq!(report.metrics.len(), ModelKind::ALL.len());

    // A fresh process only sees what was persisted
    let loaded = load_registry(&config.artifact_dir);
    assert_eq!(loaded.loaded_kinds(), trained.loaded_kinds());

    let engine = ScoreEngine::new(Arc::new(loaded), config.fallback.clone());
    let insights = engine.insights(&records[0]).unwrap();

    assert_eq!(insights.personnel_id, records[0].id);
    assert_eq!(insights.attrition_risk.method, ScoreMethod::Model);
    assert!((0.0..=1.0).contains(&insights.attrition_risk.value));
    assert!((0.0..=100.0).contains(&insights.readiness.value));
    assert!(["low", "medium", "high"].contains(&insights.leadership_potential.category.as_str()));
    assert!(insights.skill_cluster.is_some());

    // Same record, same artifacts, same answer
    let again = engine.insights(&records[0]).unwrap();
    assert_eq!(insights, again);
}

#[test]
fn missing_artifacts_mean_fallback_mode() {
    let dir = tempdir().unwrap();
    let registry = load_registry(&dir.path().join("nothing-here"));
    assert!(registry.loaded_kinds().is_empty());

    let engine = ScoreEngine::new(Arc::new(registry), Default::default());
    let record = &generate(1, 7)[0];
    let insights = engine.insights(record).unwrap();

    assert_eq!(insights.attrition_risk.method, ScoreMethod::Fallback);
    assert_eq!(insights.attrition_risk.value, 0.3);
    assert_eq!(insights.readiness.value, 75.0);
    assert_eq!(insights.skill_cluster, None);
}

#[test]
fn unseen_category_is_surfaced_after_training() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let records = generate(40, 5);
    train_and_persist(&records, &config).unwrap();

    let engine = ScoreEngine::new(Arc::new(load_registry(&config.artifact_dir)), config.fallback.clone());
    let mut record: PersonnelRecord = records[0].clone();
    record.branch = Some("Space Command".into());

    let err = engine.predict_attrition_risk(&record).unwrap_err();
    assert!(matches!(err, ScoringError::UnknownCategory { .. }));
}

#[test]
fn artifacts_of_other_velocity_variant_still_load() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.career_velocity = CareerVelocity::RankAdjusted;
    train_and_persist(&generate(40, 11), &config).unwrap();

    // Variant is recovered from the persisted layout hash, not from config
    let loaded: ModelRegistry = load_registry(&config.artifact_dir);
    let pre = loaded.preprocessor().unwrap();
    assert_eq!(pre.career_velocity, CareerVelocity::RankAdjusted);
    assert_eq!(loaded.loaded_kinds().len(), ModelKind::ALL.len());
}
