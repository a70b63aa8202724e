//! Score Engine
//!
//! Model-backed scores check the registry first. A missing model never
//! raises: the engine answers with the configured fallback constant and
//! marks the result `ScoreMethod::Fallback`. Once a model is present the
//! record is validated and encoded, and those errors do propagate.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::Array1;

use super::advice;
use super::formulas;
use super::rules::{
    attrition_risk_level, clamp_readiness, leadership_timeline, mission_suitability_level,
    promotion_timeline, readiness_category, training_priority_level, wellness_risk_level,
    RiskLevel,
};
use super::types::{
    Insights, ScoreKind, ScoreMethod, ScoreResult, SkillGap, TrainingRecommendation,
};
use crate::error::{Result, ScoringError};
use crate::logic::config::FallbackScores;
use crate::logic::features::BaseFeatures;
use crate::logic::model::{ModelKind, ModelRegistry, RawOutput, RegistryHandle};
use crate::logic::personnel::{
    validate_record, CategoricalField, LeadershipPotential, PersonnelRecord, Rank,
};

#[derive(Debug, Clone)]
pub struct ScoreEngine {
    registry: Arc<ModelRegistry>,
    fallback: FallbackScores,
}

impl ScoreEngine {
    pub fn new(registry: Arc<ModelRegistry>, fallback: FallbackScores) -> Self {
        Self { registry, fallback }
    }

    /// Engine over the handle's current registry
    pub fn from_handle(handle: &RegistryHandle, fallback: FallbackScores) -> Self {
        Self::new(handle.snapshot(), fallback)
    }

    /// Engine with no models: every model-backed score falls back
    pub fn without_models() -> Self {
        Self::new(Arc::new(ModelRegistry::empty()), FallbackScores::default())
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    // ========================================================================
    // MODEL PLUMBING
    // ========================================================================

    /// Raw output of `kind` for `record`, `None` when the model is not loaded
    fn run(&self, kind: ModelKind, record: &PersonnelRecord) -> Result<Option<RawOutput>> {
        let Some(model) = self.registry.model(kind) else {
            log::debug!("Model '{}' not loaded, using fallback", kind);
            return Ok(None);
        };

        let row = if kind.uses_feature_vector() {
            let Some(pre) = self.registry.preprocessor() else {
                return Ok(None);
            };
            Array1::from(pre.transform(record)?.values.to_vec())
        } else {
            Array1::from(record.skills.one_hot().to_vec())
        };

        model.predict(row.view()).map(Some)
    }

    fn probability(&self, kind: ModelKind, record: &PersonnelRecord) -> Result<Option<f64>> {
        match self.run(kind, record)? {
            None => Ok(None),
            Some(RawOutput::Probability(p)) => Ok(Some(p)),
            Some(other) => Err(unexpected_output(kind, &other)),
        }
    }

    fn value(&self, kind: ModelKind, record: &PersonnelRecord) -> Result<Option<f64>> {
        match self.run(kind, record)? {
            None => Ok(None),
            Some(RawOutput::Value(v)) => Ok(Some(v)),
            Some(other) => Err(unexpected_output(kind, &other)),
        }
    }

    // ========================================================================
    // MODEL-BACKED SCORES
    // ========================================================================

    /// Probability of leaving service
    pub fn predict_attrition_risk(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let Some(p) = self.probability(ModelKind::Attrition, record)? else {
            let p = self.fallback.attrition_probability;
            return Ok(ScoreResult::new(
                ScoreKind::AttritionRisk,
                p,
                attrition_risk_level(p).as_str(),
                ScoreMethod::Fallback,
            ));
        };

        let base = BaseFeatures::resolve(record);
        Ok(ScoreResult::new(
            ScoreKind::AttritionRisk,
            p,
            attrition_risk_level(p).as_str(),
            ScoreMethod::Model,
        )
        .with_factors(advice::attrition_factors(&base)))
    }

    /// Readiness on 0-100, always clamped
    pub fn predict_readiness(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let (score, method) = match self.value(ModelKind::Readiness, record)? {
            Some(v) => (clamp_readiness(v), ScoreMethod::Model),
            None => (clamp_readiness(self.fallback.readiness_score), ScoreMethod::Fallback),
        };

        let result = ScoreResult::new(
            ScoreKind::Readiness,
            score,
            readiness_category(score).as_str(),
            method,
        );
        Ok(match method {
            ScoreMethod::Model => result.with_recommendations(advice::readiness_recommendations(score)),
            _ => result,
        })
    }

    /// Leadership potential; `value` is the class index (low 0, medium 1, high 2)
    pub fn predict_leadership_potential(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let kind = ModelKind::Leadership;
        let (index, probabilities) = match self.run(kind, record)? {
            None => {
                let level = self.fallback.leadership;
                return Ok(ScoreResult::new(
                    ScoreKind::LeadershipPotential,
                    level.class_index() as f64,
                    level.as_str(),
                    ScoreMethod::Fallback,
                ));
            }
            Some(RawOutput::Class { index, probabilities }) => (index, probabilities),
            Some(other) => return Err(unexpected_output(kind, &other)),
        };

        let level = LeadershipPotential::from_class_index(index).ok_or_else(|| {
            ScoringError::invalid("leadership", format!("class index {} out of range", index))
        })?;
        let breakdown: BTreeMap<String, f64> = LeadershipPotential::ALL
            .iter()
            .zip(probabilities.iter())
            .map(|(l, p)| (l.as_str().to_string(), *p))
            .collect();

        let base = BaseFeatures::resolve(record);
        Ok(ScoreResult::new(
            ScoreKind::LeadershipPotential,
            index as f64,
            level.as_str(),
            ScoreMethod::Model,
        )
        .with_factors(advice::leadership_development_areas(&base))
        .with_breakdown(breakdown)
        .with_timeline(leadership_timeline(base.leadership_score)))
    }

    /// Promotion score with an estimated timeline as the category
    pub fn predict_career_trajectory(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let Some(score) = self.value(ModelKind::CareerTrajectory, record)? else {
            let timeline = self.fallback.promotion_timeline.clone();
            return Ok(ScoreResult::new(
                ScoreKind::CareerTrajectory,
                self.fallback.promotion_score,
                timeline.clone(),
                ScoreMethod::Fallback,
            )
            .with_timeline(timeline));
        };

        let base = BaseFeatures::resolve(record);
        let timeline = promotion_timeline(score, base.years_of_service);
        Ok(
            ScoreResult::new(ScoreKind::CareerTrajectory, score, timeline, ScoreMethod::Model)
                .with_recommendations(advice::career_development_needs(&base))
                .with_timeline(timeline),
        )
    }

    pub fn predict_mission_suitability(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let Some(score) = self.value(ModelKind::MissionOptimization, record)? else {
            let score = self.fallback.mission_suitability;
            return Ok(ScoreResult::new(
                ScoreKind::MissionSuitability,
                score,
                mission_suitability_level(score).as_str(),
                ScoreMethod::Fallback,
            )
            .with_recommendations(self.fallback.suitable_missions.clone()));
        };

        let base = BaseFeatures::resolve(record);
        Ok(ScoreResult::new(
            ScoreKind::MissionSuitability,
            score,
            mission_suitability_level(score).as_str(),
            ScoreMethod::Model,
        )
        .with_recommendations(advice::mission_recommendations(score))
        .with_breakdown(advice::mission_readiness_factors(&base)))
    }

    pub fn predict_wellness_risk(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let Some(p) = self.probability(ModelKind::Wellness, record)? else {
            let p = self.fallback.wellness_probability;
            return Ok(ScoreResult::new(
                ScoreKind::WellnessRisk,
                p,
                wellness_risk_level(p).as_str(),
                ScoreMethod::Fallback,
            ));
        };

        let level = wellness_risk_level(p);
        Ok(
            ScoreResult::new(ScoreKind::WellnessRisk, p, level.as_str(), ScoreMethod::Model)
                .with_recommendations(advice::wellness_recommendations(level)),
        )
    }

    /// Training-needs probability; without a model the closed-form flag is used
    pub fn predict_training_priority(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        let base = BaseFeatures::resolve(record);
        let recommendations = advice::training_recommendations(&base)
            .into_iter()
            .map(|r| r.description)
            .collect();

        let (value, method) = match self.probability(ModelKind::TrainingNeeds, record)? {
            Some(p) => (p, ScoreMethod::Model),
            None => {
                let readiness = label_or_formula_readiness(record, &base);
                let flag = formulas::training_priority_flag(&base, readiness);
                (f64::from(flag), ScoreMethod::Fallback)
            }
        };

        Ok(ScoreResult::new(
            ScoreKind::TrainingPriority,
            value,
            training_priority_level(value).as_str(),
            method,
        )
        .with_recommendations(recommendations))
    }

    /// Nearest skill cluster, `None` when the clustering model is not loaded
    pub fn skill_cluster(&self, record: &PersonnelRecord) -> Result<Option<usize>> {
        let kind = ModelKind::SkillClustering;
        match self.run(kind, record)? {
            None => Ok(None),
            Some(RawOutput::Cluster(c)) => Ok(Some(c)),
            Some(other) => Err(unexpected_output(kind, &other)),
        }
    }

    // ========================================================================
    // FORMULA-BACKED SCORES
    // ========================================================================

    /// Canonical weighted-sum readiness
    pub fn readiness_formula(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        validate_record(record)?;
        let base = BaseFeatures::resolve(record);
        let score = clamp_readiness(formulas::readiness_score(&base));
        Ok(
            ScoreResult::new(ScoreKind::Readiness, score, readiness_category(score).as_str(), ScoreMethod::Formula)
                .with_recommendations(advice::readiness_recommendations(score)),
        )
    }

    pub fn mission_suitability_formula(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        validate_record(record)?;
        let base = BaseFeatures::resolve(record);
        let readiness = label_or_formula_readiness(record, &base);
        let score = formulas::mission_suitability(&base, readiness);
        Ok(ScoreResult::new(
            ScoreKind::MissionSuitability,
            score,
            mission_suitability_level(score).as_str(),
            ScoreMethod::Formula,
        )
        .with_recommendations(advice::mission_recommendations(score))
        .with_breakdown(advice::mission_readiness_factors(&base)))
    }

    pub fn promotion_potential(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        validate_record(record)?;
        let base = BaseFeatures::resolve(record);
        let score = formulas::promotion_potential(&base);
        let timeline = promotion_timeline(score, base.years_of_service);
        Ok(
            ScoreResult::new(ScoreKind::PromotionPotential, score, timeline, ScoreMethod::Formula)
                .with_recommendations(advice::career_development_needs(&base))
                .with_timeline(timeline),
        )
    }

    pub fn wellness_flag(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        validate_record(record)?;
        let base = BaseFeatures::resolve(record);
        let flag = formulas::wellness_risk_flag(&base);
        let level = if flag == 1 { RiskLevel::High } else { RiskLevel::Low };
        Ok(
            ScoreResult::new(ScoreKind::WellnessRisk, f64::from(flag), level.as_str(), ScoreMethod::Formula)
                .with_recommendations(advice::wellness_recommendations(level)),
        )
    }

    pub fn training_flag(&self, record: &PersonnelRecord) -> Result<ScoreResult> {
        validate_record(record)?;
        let base = BaseFeatures::resolve(record);
        let readiness = label_or_formula_readiness(record, &base);
        let flag = formulas::training_priority_flag(&base, readiness);
        Ok(ScoreResult::new(
            ScoreKind::TrainingPriority,
            f64::from(flag),
            training_priority_level(f64::from(flag)).as_str(),
            ScoreMethod::Formula,
        ))
    }

    // ========================================================================
    // ADVICE
    // ========================================================================

    pub fn training_recommendations(&self, record: &PersonnelRecord) -> Vec<TrainingRecommendation> {
        advice::training_recommendations(&BaseFeatures::resolve(record))
    }

    pub fn skill_gaps(&self, record: &PersonnelRecord) -> SkillGap {
        let rank = record.rank.unwrap_or_else(default_rank);
        advice::skill_gaps(rank, &record.skills)
    }

    /// Every score for one record
    pub fn insights(&self, record: &PersonnelRecord) -> Result<Insights> {
        Ok(Insights {
            personnel_id: record.id.clone(),
            attrition_risk: self.predict_attrition_risk(record)?,
            readiness: self.predict_readiness(record)?,
            leadership_potential: self.predict_leadership_potential(record)?,
            career_trajectory: self.predict_career_trajectory(record)?,
            mission_suitability: self.predict_mission_suitability(record)?,
            wellness_risk: self.predict_wellness_risk(record)?,
            training_priority: self.predict_training_priority(record)?,
            recommended_training: self.training_recommendations(record),
            skill_gaps: self.skill_gaps(record),
            skill_cluster: self.skill_cluster(record)?,
        })
    }
}

/// Readiness label carried by the record, else the canonical formula
fn label_or_formula_readiness(record: &PersonnelRecord, base: &BaseFeatures) -> f64 {
    record
        .readiness_score
        .unwrap_or_else(|| formulas::readiness_score(base))
}

fn default_rank() -> Rank {
    CategoricalField::Rank
        .default_value()
        .parse()
        .unwrap_or(Rank::FlightLieutenant)
}

fn unexpected_output(kind: ModelKind, output: &RawOutput) -> ScoringError {
    ScoringError::invalid(kind.as_str(), format!("model produced unexpected output {:?}", output))
}
