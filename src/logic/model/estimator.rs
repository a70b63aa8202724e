//! Estimators - small deterministic models over ndarray
//!
//! All supervised models start from zero weights and run full-batch gradient
//! descent with L2 regularisation, so the same data and parameters always
//! yield the same weights.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

// ============================================================================
// TRAINING PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            epochs: 500,
            learning_rate: 0.1,
            l2: 0.001,
        }
    }
}

fn check_rows(x: &Array2<f64>, targets: usize) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ScoringError::InsufficientData { needed: 1, got: 0 });
    }
    if x.nrows() != targets {
        return Err(ScoringError::invalid(
            "targets",
            format!("{} rows but {} targets", x.nrows(), targets),
        ));
    }
    Ok(())
}

fn check_width(weights: usize, row: ArrayView1<f64>) -> Result<()> {
    if weights != row.len() {
        return Err(ScoringError::invalid(
            "features",
            format!("model expects {} features, got {}", weights, row.len()),
        ));
    }
    Ok(())
}

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(logits: ArrayView1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exp = logits.mapv(|z| (z - max).exp());
    let sum = exp.sum();
    exp / sum
}

// ============================================================================
// LOGISTIC REGRESSION (binary)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl LogisticRegression {
    /// `y` holds 0.0 / 1.0 labels
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &FitParams) -> Result<Self> {
        check_rows(x, y.len())?;
        let n = x.nrows() as f64;
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..params.epochs {
            let p = (x.dot(&weights) + bias).mapv(sigmoid);
            let err = &p - y;
            let grad_w = x.t().dot(&err) / n + &weights * params.l2;
            let grad_b = err.sum() / n;
            weights = weights - grad_w * params.learning_rate;
            bias -= grad_b * params.learning_rate;
        }

        Ok(Self { weights, bias })
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, row: ArrayView1<f64>) -> Result<f64> {
        check_width(self.weights.len(), row)?;
        Ok(sigmoid(row.dot(&self.weights) + self.bias))
    }
}

// ============================================================================
// SOFTMAX REGRESSION (multi-class)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxRegression {
    /// features × classes
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

impl SoftmaxRegression {
    /// `y` holds class indices below `classes`
    pub fn fit(x: &Array2<f64>, y: &[usize], classes: usize, params: &FitParams) -> Result<Self> {
        check_rows(x, y.len())?;
        if classes < 2 {
            return Err(ScoringError::invalid("classes", "need at least two classes"));
        }
        if let Some(bad) = y.iter().find(|&&c| c >= classes) {
            return Err(ScoringError::invalid(
                "targets",
                format!("class {} outside 0..{}", bad, classes),
            ));
        }

        let n = x.nrows() as f64;
        let mut one_hot = Array2::<f64>::zeros((x.nrows(), classes));
        for (i, &c) in y.iter().enumerate() {
            one_hot[[i, c]] = 1.0;
        }

        let mut weights = Array2::<f64>::zeros((x.ncols(), classes));
        let mut bias = Array1::<f64>::zeros(classes);

        for _ in 0..params.epochs {
            let mut probs = x.dot(&weights) + &bias;
            for mut row in probs.axis_iter_mut(Axis(0)) {
                let p = softmax(row.view());
                row.assign(&p);
            }
            let err = probs - &one_hot;
            let grad_w = x.t().dot(&err) / n + &weights * params.l2;
            let grad_b = err.sum_axis(Axis(0)) / n;
            weights = weights - grad_w * params.learning_rate;
            bias = bias - grad_b * params.learning_rate;
        }

        Ok(Self { weights, bias })
    }

    pub fn classes(&self) -> usize {
        self.bias.len()
    }

    pub fn predict_proba(&self, row: ArrayView1<f64>) -> Result<Vec<f64>> {
        check_width(self.weights.nrows(), row)?;
        let logits = row.dot(&self.weights) + &self.bias;
        Ok(softmax(logits.view()).to_vec())
    }

    /// Most probable class; ties resolve to the lower index
    pub fn predict(&self, row: ArrayView1<f64>) -> Result<(usize, Vec<f64>)> {
        let probs = self.predict_proba(row)?;
        let mut best = 0;
        for (i, p) in probs.iter().enumerate() {
            if *p > probs[best] {
                best = i;
            }
        }
        Ok((best, probs))
    }
}

// ============================================================================
// LINEAR REGRESSION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl LinearRegression {
    /// Bias starts at the target mean so unscaled targets converge quickly
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &FitParams) -> Result<Self> {
        check_rows(x, y.len())?;
        let n = x.nrows() as f64;
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = y.sum() / n;

        for _ in 0..params.epochs {
            let pred = x.dot(&weights) + bias;
            let err = pred - y;
            let grad_w = x.t().dot(&err) / n + &weights * params.l2;
            let grad_b = err.sum() / n;
            weights = weights - grad_w * params.learning_rate;
            bias -= grad_b * params.learning_rate;
        }

        Ok(Self { weights, bias })
    }

    pub fn predict(&self, row: ArrayView1<f64>) -> Result<f64> {
        check_width(self.weights.len(), row)?;
        Ok(row.dot(&self.weights) + self.bias)
    }
}

// ============================================================================
// K-MEANS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeans {
    /// clusters × features
    pub centroids: Array2<f64>,
}

impl KMeans {
    /// Lloyd's algorithm from `k` distinct rows picked with a seeded RNG
    pub fn fit(x: &Array2<f64>, k: usize, iterations: usize, seed: u64) -> Result<Self> {
        if k == 0 || x.nrows() < k {
            return Err(ScoringError::InsufficientData {
                needed: k.max(1),
                got: x.nrows(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let picks = rand::seq::index::sample(&mut rng, x.nrows(), k);
        let mut centroids = Array2::<f64>::zeros((k, x.ncols()));
        for (c, row) in picks.iter().enumerate() {
            centroids.row_mut(c).assign(&x.row(row));
        }

        let mut model = Self { centroids };
        for _ in 0..iterations {
            let assignments: Vec<usize> = x.axis_iter(Axis(0)).map(|r| model.nearest(r)).collect();

            let mut sums = Array2::<f64>::zeros((k, x.ncols()));
            let mut counts = vec![0usize; k];
            for (row, &c) in x.axis_iter(Axis(0)).zip(assignments.iter()) {
                let mut sum = sums.row_mut(c);
                sum += &row;
                counts[c] += 1;
            }

            let mut moved = false;
            for c in 0..k {
                // Empty clusters keep their previous centroid
                if counts[c] == 0 {
                    continue;
                }
                let updated = sums.row(c).mapv(|v| v / counts[c] as f64);
                if updated != model.centroids.row(c) {
                    moved = true;
                }
                model.centroids.row_mut(c).assign(&updated);
            }
            if !moved {
                break;
            }
        }

        Ok(model)
    }

    pub fn clusters(&self) -> usize {
        self.centroids.nrows()
    }

    pub fn predict(&self, row: ArrayView1<f64>) -> Result<usize> {
        check_width(self.centroids.ncols(), row)?;
        Ok(self.nearest(row))
    }

    fn nearest(&self, row: ArrayView1<f64>) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (c, centroid) in self.centroids.axis_iter(Axis(0)).enumerate() {
            let dist: f64 = centroid
                .iter()
                .zip(row.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            if dist < best_dist {
                best = c;
                best_dist = dist;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn test_logistic_separates_classes() {
        let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let model = LogisticRegression::fit(&x, &y, &FitParams::default()).unwrap();

        assert!(model.predict_proba(array![2.0].view()).unwrap() > 0.8);
        assert!(model.predict_proba(array![-2.0].view()).unwrap() < 0.2);
    }

    #[test]
    fn test_logistic_is_deterministic() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let y = array![0.0, 1.0, 1.0];
        let a = LogisticRegression::fit(&x, &y, &FitParams::default()).unwrap();
        let b = LogisticRegression::fit(&x, &y, &FitParams::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let x = array![[0.0, 1.0], [1.0, 0.0]];
        let y = array![0.0, 1.0];
        let model = LogisticRegression::fit(&x, &y, &FitParams::default()).unwrap();
        assert!(model.predict_proba(array![1.0].view()).is_err());
    }

    #[test]
    fn test_softmax_three_classes() {
        let x = array![[-2.0], [-1.8], [0.0], [0.1], [2.0], [1.8]];
        let y = [0, 0, 1, 1, 2, 2];
        let params = FitParams {
            epochs: 2000,
            learning_rate: 0.5,
            l2: 0.0,
        };
        let model = SoftmaxRegression::fit(&x, &y, 3, &params).unwrap();

        let (class, probs) = model.predict(array![2.0].view()).unwrap();
        assert_eq!(class, 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(model.predict(array![-2.0].view()).unwrap().0, 0);
    }

    #[test]
    fn test_softmax_rejects_out_of_range_label() {
        let x = array![[0.0], [1.0]];
        assert!(SoftmaxRegression::fit(&x, &[0, 3], 3, &FitParams::default()).is_err());
    }

    #[test]
    fn test_linear_recovers_line() {
        let x = array![[-1.0], [0.0], [1.0], [2.0]];
        let y = array![48.0, 50.0, 52.0, 54.0];
        let params = FitParams {
            epochs: 2000,
            learning_rate: 0.1,
            l2: 0.0,
        };
        let model = LinearRegression::fit(&x, &y, &params).unwrap();

        assert!((model.weights[0] - 2.0).abs() < 1e-6);
        assert!((model.predict(array![3.0].view()).unwrap() - 56.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_training_set() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearRegression::fit(&x, &y, &FitParams::default()),
            Err(ScoringError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_kmeans_finds_two_groups() {
        let x = array![[0.0, 0.0], [0.1, 0.0], [0.0, 0.1], [5.0, 5.0], [5.1, 5.0], [5.0, 5.1]];
        let model = KMeans::fit(&x, 2, 50, 42).unwrap();

        let a = model.predict(array![0.05, 0.05].view()).unwrap();
        let b = model.predict(array![5.05, 5.05].view()).unwrap();
        assert_ne!(a, b);
        assert_eq!(model.predict(x.row(0)).unwrap(), a);
        assert_eq!(model.predict(x.row(4)).unwrap(), b);
    }

    #[test]
    fn test_kmeans_needs_enough_rows() {
        let x = array![[0.0], [1.0]];
        assert!(KMeans::fit(&x, 5, 10, 42).is_err());
    }
}
