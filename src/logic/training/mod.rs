//! Training Module - batch fit of preprocessor and every model
//!
//! 1. Fill missing labels (seeded)
//! 2. Fit encoders + scaler over the whole dataset
//! 3. Seeded shuffle, hold-out split
//! 4. Fit each model on the training rows, score it on the hold-out rows
//! 5. Optionally persist everything as artifacts

use std::collections::BTreeMap;
use std::path::PathBuf;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScoringError};
use crate::logic::config::ScoringConfig;
use crate::logic::dataset::generator::leadership_label;
use crate::logic::features::{BaseFeatures, CareerVelocity, Preprocessor, FEATURE_COUNT};
use crate::logic::model::estimator::sigmoid;
use crate::logic::model::metrics::{accuracy, mean_squared_error, r2_score};
use crate::logic::model::{
    save_registry, FitParams, KMeans, LinearRegression, LogisticRegression, Metric, ModelEntry,
    ModelKind, ModelRegistry, RawOutput, SoftmaxRegression, TrainedModel,
};
use crate::logic::personnel::{LeadershipPotential, PersonnelRecord, SKILL_COUNT};
use crate::logic::scoring::formulas;

/// Smallest dataset the pipeline will train on
pub const MIN_TRAINING_RECORDS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: Uuid,
    pub records: usize,
    pub train_records: usize,
    pub test_records: usize,
    pub career_velocity: CareerVelocity,
    pub layout_hash: u32,
    pub metrics: BTreeMap<ModelKind, Metric>,
    pub artifacts: Vec<PathBuf>,
}

// ============================================================================
// LABELS
// ============================================================================

/// Per-record training targets
#[derive(Debug, Clone, Copy, PartialEq)]
struct Targets {
    attrition: f64,
    readiness: f64,
    leadership: usize,
    promotion: f64,
    mission: f64,
    wellness: f64,
    training: f64,
}

/// Labels carried by the record, the generator's rules for the rest.
/// The attrition draw for unlabelled records comes from `rng`.
fn targets(record: &PersonnelRecord, rng: &mut StdRng) -> Targets {
    let base = BaseFeatures::resolve(record);
    let readiness = record
        .readiness_score
        .unwrap_or_else(|| formulas::readiness_score(&base));
    let attrition = record.attrition_risk.unwrap_or_else(|| {
        formulas::attrition_label(formulas::attrition_risk_points(&base), rng.gen::<f64>())
    });
    let leadership = record
        .leadership_potential
        .unwrap_or_else(|| leadership_label(base.leadership_score, base.peer_review_score));

    Targets {
        attrition: if attrition { 1.0 } else { 0.0 },
        readiness,
        leadership: leadership.class_index(),
        promotion: formulas::promotion_potential(&base),
        mission: formulas::mission_suitability(&base, readiness),
        wellness: f64::from(formulas::wellness_risk_flag(&base)),
        training: f64::from(formulas::training_priority_flag(&base, readiness)),
    }
}

// ============================================================================
// SPLIT
// ============================================================================

/// Seeded shuffle, then the first `test_fraction` of indices are held out
fn split(n: usize, test_fraction: f64, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let fraction = test_fraction.clamp(0.0, 0.9);
    let mut test_len = (n as f64 * fraction).round() as usize;
    if fraction > 0.0 && test_len == 0 && n > 1 {
        test_len = 1;
    }

    let train = indices.split_off(test_len);
    (train, indices)
}

fn rows(matrix: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    matrix.select(ndarray::Axis(0), indices)
}

fn column<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i]).collect()
}

// ============================================================================
// TRAINING
// ============================================================================

struct Split<'a> {
    features: &'a Array2<f64>,
    train: &'a [usize],
    test: &'a [usize],
}

impl Split<'_> {
    fn classifier(&self, y: &[f64], params: &FitParams) -> Result<(TrainedModel, Metric)> {
        let model = LogisticRegression::fit(
            &rows(self.features, self.train),
            &Array1::from(column(y, self.train)),
            params,
        )?;

        let test_x = rows(self.features, self.test);
        let predicted: Vec<f64> = test_x
            .rows()
            .into_iter()
            .map(|r| {
                let p = sigmoid(r.dot(&model.weights) + model.bias);
                if p >= 0.5 { 1.0 } else { 0.0 }
            })
            .collect();
        let metric = Metric::Accuracy {
            value: accuracy(&column(y, self.test), &predicted),
        };

        Ok((TrainedModel::Logistic(model), metric))
    }

    fn regressor(&self, y: &[f64], params: &FitParams) -> Result<(TrainedModel, Metric)> {
        let model = LinearRegression::fit(
            &rows(self.features, self.train),
            &Array1::from(column(y, self.train)),
            params,
        )?;

        let test_x = rows(self.features, self.test);
        let predicted: Vec<f64> = test_x
            .rows()
            .into_iter()
            .map(|r| r.dot(&model.weights) + model.bias)
            .collect();
        let actual = column(y, self.test);
        let metric = Metric::Regression {
            mse: mean_squared_error(&actual, &predicted),
            r2: r2_score(&actual, &predicted),
        };

        Ok((TrainedModel::Linear(model), metric))
    }

    fn multiclass(&self, y: &[usize], classes: usize, params: &FitParams) -> Result<(TrainedModel, Metric)> {
        let model = SoftmaxRegression::fit(
            &rows(self.features, self.train),
            &column(y, self.train),
            classes,
            params,
        )?;

        let trained = TrainedModel::Softmax(model);
        let test_x = rows(self.features, self.test);
        let mut predicted = Vec::with_capacity(self.test.len());
        for r in test_x.rows() {
            if let RawOutput::Class { index, .. } = trained.predict(r)? {
                predicted.push(index);
            }
        }
        let metric = Metric::Accuracy {
            value: accuracy(&column(y, self.test), &predicted),
        };

        Ok((trained, metric))
    }
}

/// Fit the preprocessor and every model; nothing is written to disk
pub fn train(records: &[PersonnelRecord], config: &ScoringConfig) -> Result<(ModelRegistry, TrainingReport)> {
    if records.len() < MIN_TRAINING_RECORDS {
        return Err(ScoringError::InsufficientData {
            needed: MIN_TRAINING_RECORDS,
            got: records.len(),
        });
    }

    let settings = &config.training;
    let params = settings.fit_params();
    let run_id = Uuid::new_v4();
    let mut rng = StdRng::seed_from_u64(settings.seed);

    log::info!(
        "Training run {} on {} records (career velocity: {})",
        run_id,
        records.len(),
        config.career_velocity
    );

    let targets: Vec<Targets> = records.iter().map(|r| targets(r, &mut rng)).collect();

    // Feature matrix
    let pre = Preprocessor::fit(records, config.career_velocity)?;
    let mut features = Array2::<f64>::zeros((records.len(), FEATURE_COUNT));
    for (i, record) in records.iter().enumerate() {
        let vector = pre.transform(record)?;
        features.row_mut(i).assign(&Array1::from(vector.values.to_vec()));
    }

    let (train_idx, test_idx) = split(records.len(), settings.test_fraction, &mut rng);
    let data = Split {
        features: &features,
        train: &train_idx,
        test: &test_idx,
    };

    let pick = |f: fn(&Targets) -> f64| -> Vec<f64> { targets.iter().map(f).collect() };

    let mut fitted: Vec<(ModelKind, TrainedModel, Metric)> = Vec::new();

    let (m, metric) = data.classifier(&pick(|t| t.attrition), &params)?;
    fitted.push((ModelKind::Attrition, m, metric));

    let (m, metric) = data.regressor(&pick(|t| t.readiness), &params)?;
    fitted.push((ModelKind::Readiness, m, metric));

    let leadership: Vec<usize> = targets.iter().map(|t| t.leadership).collect();
    let (m, metric) = data.multiclass(&leadership, LeadershipPotential::ALL.len(), &params)?;
    fitted.push((ModelKind::Leadership, m, metric));

    let (m, metric) = data.regressor(&pick(|t| t.promotion), &params)?;
    fitted.push((ModelKind::CareerTrajectory, m, metric));

    let (m, metric) = data.regressor(&pick(|t| t.mission), &params)?;
    fitted.push((ModelKind::MissionOptimization, m, metric));

    let (m, metric) = data.classifier(&pick(|t| t.wellness), &params)?;
    fitted.push((ModelKind::Wellness, m, metric));

    let (m, metric) = data.classifier(&pick(|t| t.training), &params)?;
    fitted.push((ModelKind::TrainingNeeds, m, metric));

    // Skill clustering sees every record; there is no label to hold out
    let mut skills = Array2::<f64>::zeros((records.len(), SKILL_COUNT));
    for (i, record) in records.iter().enumerate() {
        skills.row_mut(i).assign(&Array1::from(record.skills.one_hot().to_vec()));
    }
    let kmeans = KMeans::fit(&skills, settings.skill_clusters, settings.kmeans_iterations, settings.seed)?;
    let inertia = skills
        .rows()
        .into_iter()
        .map(|r| {
            let c = kmeans.predict(r).unwrap_or(0);
            let d = &kmeans.centroids.row(c) - &r;
            d.dot(&d)
        })
        .sum::<f64>()
        / records.len() as f64;
    fitted.push((
        ModelKind::SkillClustering,
        TrainedModel::KMeans(kmeans),
        Metric::Inertia { value: inertia },
    ));

    let mut metrics = BTreeMap::new();
    let layout_hash = pre.layout_hash();
    let mut registry = ModelRegistry::new(Some(pre));
    for (kind, model, metric) in fitted {
        log::info!("Model '{}' ({}): {}", kind, model.estimator_name(), metric);
        metrics.insert(kind, metric);
        let trained_on = if kind.uses_feature_vector() { train_idx.len() } else { records.len() };
        registry = registry.with_model(ModelEntry::new(kind, run_id, model, trained_on, Some(metric)));
    }

    let report = TrainingReport {
        run_id,
        records: records.len(),
        train_records: train_idx.len(),
        test_records: test_idx.len(),
        career_velocity: config.career_velocity,
        layout_hash,
        metrics,
        artifacts: Vec::new(),
    };

    Ok((registry, report))
}

/// Train, then persist every artifact under `config.artifact_dir`
pub fn train_and_persist(
    records: &[PersonnelRecord],
    config: &ScoringConfig,
) -> Result<(ModelRegistry, TrainingReport)> {
    let (registry, mut report) = train(records, config)?;
    report.artifacts = save_registry(&config.artifact_dir, &registry)?;
    Ok((registry, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::generate;
    use crate::logic::model::load_registry;
    use tempfile::tempdir;

    fn quick_config(dir: PathBuf) -> ScoringConfig {
        let mut config = ScoringConfig {
            artifact_dir: dir,
            ..Default::default()
        };
        config.training.epochs = 60;
        config
    }

    #[test]
    fn test_split_is_seeded_and_disjoint() {
        let (train_a, test_a) = split(50, 0.2, &mut StdRng::seed_from_u64(42));
        let (train_b, test_b) = split(50, 0.2, &mut StdRng::seed_from_u64(42));
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 10);
        assert_eq!(train_a.len(), 40);
        assert!(test_a.iter().all(|i| !train_a.contains(i)));
    }

    #[test]
    fn test_too_few_records() {
        let config = quick_config(PathBuf::from("unused"));
        let err = train(&generate(5, 1), &config).unwrap_err();
        assert!(matches!(err, ScoringError::InsufficientData { needed: 10, got: 5 }));
    }

    #[test]
    fn test_train_fits_every_model() {
        let config = quick_config(PathBuf::from("unused"));
        let (registry, report) = train(&generate(80, 42), &config).unwrap();

        assert_eq!(registry.loaded_kinds(), ModelKind::ALL.to_vec());
        assert_eq!(report.metrics.len(), ModelKind::ALL.len());
        assert_eq!(report.train_records + report.test_records, 80);
        assert_eq!(report.test_records, 16);
        assert!(report.artifacts.is_empty());
    }

    #[test]
    fn test_unlabelled_records_get_targets() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut r = PersonnelRecord::default();
        r.leadership_score = Some(9.0);
        r.peer_review_score = Some(9.0);
        let t = targets(&r, &mut rng);
        assert_eq!(t.leadership, LeadershipPotential::High.class_index());
        assert_eq!(t.readiness, formulas::readiness_score(&BaseFeatures::resolve(&r)));
    }

    #[test]
    fn test_train_and_persist_round_trip() {
        let dir = tempdir().unwrap();
        let config = quick_config(dir.path().to_path_buf());
        let (registry, report) = train_and_persist(&generate(60, 9), &config).unwrap();

        // encoders + scaler + one file per model
        assert_eq!(report.artifacts.len(), 2 + ModelKind::ALL.len());

        let loaded = load_registry(dir.path());
        assert_eq!(loaded.loaded_kinds(), registry.loaded_kinds());
        assert_eq!(loaded.preprocessor(), registry.preprocessor());
    }
}
