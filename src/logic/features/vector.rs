//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks

use serde::{Deserialize, Serialize};

use super::defaults::BaseFeatures;
use super::derived::{CareerVelocity, DerivedFeatures};
use super::encoder::EncoderSet;
use super::layout::{
    feature_index, layout_hash, validate_layout, BASE_COUNT, CATEGORICAL_OFFSET, DERIVED_OFFSET,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};
use super::scaler::Scaler;
use crate::error::{Result, ScoringError};
use crate::logic::personnel::{validate_record, PersonnelRecord};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
///
/// Every model consumes this type; raw arrays never cross the
/// builder/engine boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Whether `values` went through the scaler
    pub scaled: bool,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(
        values: [f64; FEATURE_COUNT],
        career_velocity: CareerVelocity,
        scaled: bool,
    ) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(career_velocity),
            scaled,
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    pub fn base(&self) -> &[f64] {
        &self.values[..BASE_COUNT]
    }

    pub fn derived(&self) -> &[f64] {
        &self.values[DERIVED_OFFSET..CATEGORICAL_OFFSET]
    }

    pub fn encoded(&self) -> &[f64] {
        &self.values[CATEGORICAL_OFFSET..]
    }

    /// Validate that this vector was built against `expected_hash`
    pub fn validate(&self, expected_hash: u32) -> Result<()> {
        validate_layout(self.version, self.layout_hash, expected_hash)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "scaled": self.scaled,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// FEATURE BUILDER
// ============================================================================

/// Record → FeatureVector
///
/// Steps: validate, resolve defaults, derive, encode, optionally scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureBuilder {
    pub career_velocity: CareerVelocity,
}

impl FeatureBuilder {
    pub fn new(career_velocity: CareerVelocity) -> Self {
        Self { career_velocity }
    }

    /// Unscaled values in layout order
    pub fn raw_values(
        &self,
        record: &PersonnelRecord,
        encoders: &EncoderSet,
    ) -> Result<[f64; FEATURE_COUNT]> {
        validate_record(record)?;

        let base = BaseFeatures::resolve(record);
        let derived = DerivedFeatures::compute(&base, record.rank, self.career_velocity);
        let encoded = encoders.encode_record(record)?;

        let mut values = [0.0; FEATURE_COUNT];
        values[..BASE_COUNT].copy_from_slice(&base.to_array());
        values[DERIVED_OFFSET..CATEGORICAL_OFFSET].copy_from_slice(&derived.to_array());
        if encoded.len() != FEATURE_COUNT - CATEGORICAL_OFFSET {
            return Err(ScoringError::invalid(
                "encoders",
                format!("expected {} encoded fields, got {}", FEATURE_COUNT - CATEGORICAL_OFFSET, encoded.len()),
            ));
        }
        values[CATEGORICAL_OFFSET..].copy_from_slice(&encoded);

        Ok(values)
    }

    pub fn build(
        &self,
        record: &PersonnelRecord,
        encoders: &EncoderSet,
        scaler: Option<&Scaler>,
    ) -> Result<FeatureVector> {
        let raw = self.raw_values(record, encoders)?;
        let vector = match scaler {
            Some(scaler) => FeatureVector::from_values(scaler.transform(&raw), self.career_velocity, true),
            None => FeatureVector::from_values(raw, self.career_velocity, false),
        };
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> (PersonnelRecord, EncoderSet) {
        let mut record = PersonnelRecord::new("IAF_000001", "Test Officer");
        record.years_of_service = Some(0.0);
        record.missions_participated = Some(10.0);
        record.mission_success_rate = Some(0.93);
        let encoders = EncoderSet::fit(std::slice::from_ref(&record));
        (record, encoders)
    }

    #[test]
    fn test_build_unscaled() {
        let (record, encoders) = fitted();
        let vector = FeatureBuilder::default().build(&record, &encoders, None).unwrap();

        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash(CareerVelocity::Simplified));
        assert!(!vector.scaled);
        assert_eq!(vector.get_by_name("service_efficiency"), Some(10.0));
        assert_eq!(vector.get_by_name("mission_success_rate"), Some(0.93));
        assert_eq!(vector.get_by_name("age"), Some(30.0));
        assert!(vector.encoded().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_build_scaled() {
        let (record, encoders) = fitted();
        let builder = FeatureBuilder::default();
        let raw = builder.raw_values(&record, &encoders).unwrap();
        let scaler = Scaler::fit(&[raw]).unwrap();

        let vector = builder.build(&record, &encoders, Some(&scaler)).unwrap();
        assert!(vector.scaled);
        assert!(vector.values.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_invalid_record_rejected() {
        let (mut record, encoders) = fitted();
        record.years_of_service = Some(-1.0);
        let err = FeatureBuilder::default().build(&record, &encoders, None).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidField { .. }));
    }

    #[test]
    fn test_validate_against_other_variant() {
        let (record, encoders) = fitted();
        let vector = FeatureBuilder::default().build(&record, &encoders, None).unwrap();
        assert!(vector.validate(layout_hash(CareerVelocity::Simplified)).is_ok());
        assert!(vector.validate(layout_hash(CareerVelocity::RankAdjusted)).is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let (record, encoders) = fitted();
        let vector = FeatureBuilder::default().build(&record, &encoders, None).unwrap();
        let log = vector.to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["named_values"]["complaints"], 0.0);
    }
}
