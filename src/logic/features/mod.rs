//! Features Module - record → feature vector
//!
//! # Architecture
//! - `layout.rs`: versioned feature order and layout hash
//! - `defaults.rs`: base numeric fields with the default table
//! - `derived.rs`: derived formulas, career velocity variants
//! - `encoder.rs`: label encoders for categorical fields
//! - `scaler.rs`: standardization
//! - `vector.rs`: `FeatureVector`, `FeatureBuilder`
//! - `preprocessor.rs`: encoders + scaler fitted together

pub mod defaults;
pub mod derived;
pub mod encoder;
pub mod layout;
pub mod preprocessor;
pub mod scaler;
pub mod vector;

#[cfg(test)]
mod tests;

pub use defaults::BaseFeatures;
pub use derived::{CareerVelocity, DerivedFeatures};
pub use encoder::{EncoderSet, LabelEncoder};
pub use layout::{layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use preprocessor::Preprocessor;
pub use scaler::Scaler;
pub use vector::{FeatureBuilder, FeatureVector};

use crate::error::{Result, ScoringError};
use crate::logic::personnel::PersonnelRecord;

/// Fit one label encoder per categorical field
pub fn fit_encoders(records: &[PersonnelRecord]) -> EncoderSet {
    EncoderSet::fit(records)
}

/// Fit a scaler over unscaled feature vectors
pub fn fit_scaler(vectors: &[FeatureVector]) -> Result<Scaler> {
    if let Some(i) = vectors.iter().position(|v| v.scaled) {
        return Err(ScoringError::invalid(
            "feature_vector",
            format!("vector {} is already scaled; fit the scaler on raw vectors", i),
        ));
    }
    let raw: Vec<[f64; FEATURE_COUNT]> = vectors.iter().map(|v| v.values).collect();
    Scaler::fit(&raw)
}

/// Build a feature vector with the default career velocity formula
pub fn build(
    record: &PersonnelRecord,
    encoders: &EncoderSet,
    scaler: Option<&Scaler>,
) -> Result<FeatureVector> {
    FeatureBuilder::default().build(record, encoders, scaler)
}
