//! Scaler - per-feature standardization

use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use crate::error::{Result, ScoringError};

/// Floor used when a feature has zero variance in the training set
pub const STD_FLOOR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: [f64; FEATURE_COUNT],
    pub std: [f64; FEATURE_COUNT],
}

impl Scaler {
    /// Population mean and standard deviation per feature
    pub fn fit(vectors: &[[f64; FEATURE_COUNT]]) -> Result<Self> {
        if vectors.is_empty() {
            return Err(ScoringError::InsufficientData { needed: 1, got: 0 });
        }

        let n = vectors.len() as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        for v in vectors {
            for (m, x) in mean.iter_mut().zip(v.iter()) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut std = [0.0; FEATURE_COUNT];
        for v in vectors {
            for i in 0..FEATURE_COUNT {
                let d = v[i] - mean[i];
                std[i] += d * d;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n).sqrt();
            if *s == 0.0 || !s.is_finite() {
                *s = STD_FLOOR;
            }
        }

        Ok(Self { mean, std })
    }

    pub fn transform(&self, values: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (values[i] - self.mean[i]) / self.std[i];
        }
        out
    }

    pub fn inverse_transform(&self, values: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = values[i] * self.std[i] + self.mean[i];
        }
        out
    }

    /// Finite statistics and strictly positive deviations
    pub fn is_valid(&self) -> bool {
        self.mean.iter().all(|m| m.is_finite())
            && self.std.iter().all(|s| s.is_finite() && *s > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: f64) -> [f64; FEATURE_COUNT] {
        [value; FEATURE_COUNT]
    }

    #[test]
    fn test_fit_mean_and_std() {
        let scaler = Scaler::fit(&[row(1.0), row(3.0)]).unwrap();
        assert_eq!(scaler.mean[0], 2.0);
        assert_eq!(scaler.std[0], 1.0);
        assert_eq!(scaler.transform(&row(3.0))[5], 1.0);
    }

    #[test]
    fn test_zero_variance_uses_floor() {
        let scaler = Scaler::fit(&[row(4.0), row(4.0), row(4.0)]).unwrap();
        assert!(scaler.std.iter().all(|s| *s == STD_FLOOR));
        assert_eq!(scaler.transform(&row(4.0)), row(0.0));
        assert!(scaler.is_valid());
    }

    #[test]
    fn test_empty_fit_rejected() {
        assert!(matches!(
            Scaler::fit(&[]),
            Err(ScoringError::InsufficientData { needed: 1, got: 0 })
        ));
    }

    #[test]
    fn test_inverse_transform() {
        let scaler = Scaler::fit(&[row(2.0), row(10.0)]).unwrap();
        let scaled = scaler.transform(&row(6.5));
        assert_eq!(scaler.inverse_transform(&scaled), row(6.5));
    }
}
