//! Cross-module tests for the feature pipeline

use proptest::prelude::*;

use super::*;
use crate::error::ScoringError;
use crate::logic::personnel::{CategoricalField, PersonnelRecord, Rank};

fn squadron(n: usize) -> Vec<PersonnelRecord> {
    (0..n)
        .map(|i| {
            let mut r = PersonnelRecord::new(format!("IAF_{:06}", i + 1), format!("Officer {}", i));
            r.rank = Rank::from_level((i % 10) as u8 + 1);
            r.branch = Some(["Flying", "Technical", "Ground Duty"][i % 3].to_string());
            r.years_of_service = Some((i % 30) as f64);
            r.fitness_score = Some(50.0 + (i % 50) as f64);
            r.stress_index = Some((i * 7 % 100) as f64);
            r
        })
        .collect()
}

#[test]
fn test_build_with_fitted_scaler() {
    let records = squadron(12);
    let encoders = fit_encoders(&records);
    let raw: Vec<FeatureVector> = records
        .iter()
        .map(|r| build(r, &encoders, None))
        .collect::<crate::error::Result<_>>()
        .unwrap();
    let scaler = fit_scaler(&raw).unwrap();

    let scaled = build(&records[3], &encoders, Some(&scaler)).unwrap();
    let expected = scaler.transform(&raw[3].values);
    assert_eq!(scaled.values, expected);
}

#[test]
fn test_scaler_rejects_scaled_vectors() {
    let records = squadron(6);
    let encoders = fit_encoders(&records);
    let raw: Vec<FeatureVector> = records
        .iter()
        .map(|r| build(r, &encoders, None))
        .collect::<crate::error::Result<_>>()
        .unwrap();
    let scaler = fit_scaler(&raw).unwrap();

    let mut mixed = raw.clone();
    mixed[2] = build(&records[2], &encoders, Some(&scaler)).unwrap();
    let err = fit_scaler(&mixed).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidField { ref field, .. } if field == "feature_vector"));
}

#[test]
fn test_default_must_be_in_vocabulary() {
    let mut known = PersonnelRecord::new("1", "A");
    known.branch = Some("Technical".into());
    let encoders = fit_encoders(&[known]);

    // Missing branch falls back to "Flying", which was never fitted
    let err = build(&PersonnelRecord::new("2", "B"), &encoders, None).unwrap_err();
    assert!(matches!(
        err,
        ScoringError::UnknownCategory { field: CategoricalField::Branch, .. }
    ));
}

#[test]
fn test_rank_adjusted_builder_changes_only_velocity() {
    let records = squadron(5);
    let encoders = fit_encoders(&records);
    let simplified = FeatureBuilder::new(CareerVelocity::Simplified)
        .build(&records[4], &encoders, None)
        .unwrap();
    let adjusted = FeatureBuilder::new(CareerVelocity::RankAdjusted)
        .build(&records[4], &encoders, None)
        .unwrap();

    let velocity = layout::feature_index("career_velocity").unwrap();
    for i in 0..FEATURE_COUNT {
        if i == velocity {
            assert_ne!(simplified.values[i], adjusted.values[i]);
        } else {
            assert_eq!(simplified.values[i], adjusted.values[i]);
        }
    }
    assert_ne!(simplified.layout_hash, adjusted.layout_hash);
}

proptest! {
    #[test]
    fn prop_build_is_deterministic(
        age in 18.0f64..60.0,
        yos in 0.0f64..40.0,
        fitness in 0.0f64..=100.0,
        stress in 0.0f64..=100.0,
        msr in 0.0f64..=1.0,
        rank_level in 1u8..=10,
    ) {
        let mut record = PersonnelRecord::new("IAF_000042", "Prop");
        record.age = Some(age);
        record.years_of_service = Some(yos);
        record.fitness_score = Some(fitness);
        record.stress_index = Some(stress);
        record.mission_success_rate = Some(msr);
        record.rank = Rank::from_level(rank_level);

        let encoders = fit_encoders(std::slice::from_ref(&record));
        let first = build(&record, &encoders, None).unwrap();
        let second = build(&record, &encoders, None).unwrap();

        prop_assert_eq!(first.values.map(f64::to_bits), second.values.map(f64::to_bits));
        prop_assert_eq!(first.get_by_name("mission_success_rate"), Some(msr));
    }

    #[test]
    fn prop_encoding_is_bijective(values in proptest::collection::vec("[A-Za-z ]{1,12}", 1..20)) {
        let encoder = LabelEncoder::fit(values.iter().cloned());
        for value in &values {
            let index = encoder.encode(value).unwrap();
            prop_assert_eq!(encoder.decode(index), Some(value.as_str()));
        }
    }
}
