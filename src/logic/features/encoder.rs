//! Label Encoders - categorical value → stable integer index
//!
//! Classes are kept sorted alphabetically, so the index of a value is its
//! position in the sorted vocabulary. Fitting the same values in any order
//! yields the same encoder.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::logic::personnel::{CategoricalField, PersonnelRecord};

// ============================================================================
// LABEL ENCODER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        Self {
            classes: unique.into_iter().collect(),
        }
    }

    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .ok()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Sorted, duplicate-free class list
    fn is_well_formed(&self) -> bool {
        self.classes.windows(2).all(|w| w[0] < w[1])
    }
}

// ============================================================================
// ENCODER SET
// ============================================================================

/// One fitted encoder per categorical field. Read-only once fitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSet {
    encoders: BTreeMap<CategoricalField, LabelEncoder>,
}

impl EncoderSet {
    /// Fit every categorical field over the observed values.
    /// Missing fields contribute their default value to the vocabulary.
    pub fn fit(records: &[PersonnelRecord]) -> Self {
        let encoders = CategoricalField::ALL
            .iter()
            .map(|&field| {
                let values = records.iter().map(|r| r.category_or_default(field));
                (field, LabelEncoder::fit(values))
            })
            .collect();
        Self { encoders }
    }

    pub fn get(&self, field: CategoricalField) -> Option<&LabelEncoder> {
        self.encoders.get(&field)
    }

    /// Index of `value`, or `UnknownCategory` when it was never seen
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<usize> {
        self.get(field)
            .and_then(|encoder| encoder.encode(value))
            .ok_or_else(|| ScoringError::UnknownCategory {
                field,
                value: value.to_string(),
            })
    }

    pub fn decode(&self, field: CategoricalField, index: usize) -> Option<&str> {
        self.get(field).and_then(|encoder| encoder.decode(index))
    }

    /// Encode every categorical field of a record, in layout order
    pub fn encode_record(&self, record: &PersonnelRecord) -> Result<Vec<f64>> {
        CategoricalField::ALL
            .iter()
            .map(|&field| {
                let value = record.category_or_default(field);
                self.encode(field, value).map(|index| index as f64)
            })
            .collect()
    }

    /// All fields present and every class list sorted
    pub fn is_complete(&self) -> bool {
        CategoricalField::ALL.iter().all(|field| {
            self.encoders
                .get(field)
                .map(|e| !e.is_empty() && e.is_well_formed())
                .unwrap_or(false)
        })
    }

    pub fn vocabulary_sizes(&self) -> BTreeMap<CategoricalField, usize> {
        self.encoders.iter().map(|(f, e)| (*f, e.len())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::personnel::Rank;

    #[test]
    fn test_classes_sorted_alphabetically() {
        let encoder = LabelEncoder::fit(["Navigation", "Flying", "Logistics", "Flying"]);
        assert_eq!(encoder.classes(), &["Flying", "Logistics", "Navigation"]);
        assert_eq!(encoder.encode("Flying"), Some(0));
        assert_eq!(encoder.encode("Navigation"), Some(2));
        assert_eq!(encoder.decode(1), Some("Logistics"));
        assert_eq!(encoder.decode(3), None);
    }

    #[test]
    fn test_fit_order_does_not_matter() {
        let a = LabelEncoder::fit(["b", "a", "c"]);
        let b = LabelEncoder::fit(["c", "b", "a", "a"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let mut record = PersonnelRecord::new("IAF_000001", "A");
        record.branch = Some("Flying".into());
        let set = EncoderSet::fit(&[record]);

        let err = set.encode(CategoricalField::Branch, "Space").unwrap_err();
        match err {
            ScoringError::UnknownCategory { field, value } => {
                assert_eq!(field, CategoricalField::Branch);
                assert_eq!(value, "Space");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_fit_defaults() {
        let set = EncoderSet::fit(&[PersonnelRecord::default()]);
        assert!(set.is_complete());
        assert_eq!(
            set.encode(CategoricalField::Rank, Rank::FlightLieutenant.as_str()).unwrap(),
            0
        );
        assert_eq!(set.vocabulary_sizes().len(), CategoricalField::ALL.len());
    }

    #[test]
    fn test_encode_record_follows_layout_order() {
        let mut a = PersonnelRecord::new("1", "A");
        a.rank = Some(Rank::AirMarshal);
        let mut b = PersonnelRecord::new("2", "B");
        b.rank = Some(Rank::PilotOfficer);
        let set = EncoderSet::fit(&[a.clone(), b]);

        let encoded = set.encode_record(&a).unwrap();
        assert_eq!(encoded.len(), CategoricalField::ALL.len());
        // "Air Marshal" < "Pilot Officer"
        assert_eq!(encoded[0], 0.0);
    }
}
