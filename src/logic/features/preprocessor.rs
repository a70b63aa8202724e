//! Preprocessor - fitted encoders + scaler bundled with the layout they belong to

use serde::{Deserialize, Serialize};

use super::derived::CareerVelocity;
use super::encoder::EncoderSet;
use super::layout::{layout_hash, FEATURE_COUNT};
use super::scaler::Scaler;
use super::vector::{FeatureBuilder, FeatureVector};
use crate::error::Result;
use crate::logic::personnel::PersonnelRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub career_velocity: CareerVelocity,
    pub encoders: EncoderSet,
    pub scaler: Scaler,
}

impl Preprocessor {
    /// Fit encoders, then the scaler over the unscaled training vectors
    pub fn fit(records: &[PersonnelRecord], career_velocity: CareerVelocity) -> Result<Self> {
        let encoders = EncoderSet::fit(records);
        let builder = FeatureBuilder::new(career_velocity);
        let raw = records
            .iter()
            .map(|r| builder.raw_values(r, &encoders))
            .collect::<Result<Vec<[f64; FEATURE_COUNT]>>>()?;
        let scaler = Scaler::fit(&raw)?;

        Ok(Self {
            career_velocity,
            encoders,
            scaler,
        })
    }

    pub fn builder(&self) -> FeatureBuilder {
        FeatureBuilder::new(self.career_velocity)
    }

    pub fn layout_hash(&self) -> u32 {
        layout_hash(self.career_velocity)
    }

    /// Scaled feature vector for one record
    pub fn transform(&self, record: &PersonnelRecord) -> Result<FeatureVector> {
        self.builder().build(record, &self.encoders, Some(&self.scaler))
    }
}
