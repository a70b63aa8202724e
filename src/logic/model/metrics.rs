//! Hold-out metrics logged after training

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metric {
    Accuracy { value: f64 },
    Regression { mse: f64, r2: f64 },
    Inertia { value: f64 },
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Accuracy { value } => write!(f, "accuracy={:.4}", value),
            Metric::Regression { mse, r2 } => write!(f, "mse={:.4} r2={:.4}", mse, r2),
            Metric::Inertia { value } => write!(f, "inertia={:.4}", value),
        }
    }
}

pub fn accuracy<T: PartialEq>(actual: &[T], predicted: &[T]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let hits = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    hits as f64 / actual.len() as f64
}

pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    sum / actual.len() as f64
}

/// Coefficient of determination; 0.0 when the targets are constant
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[1, 0, 1, 1], &[1, 1, 1, 0]), 0.5);
        assert_eq!(accuracy::<u8>(&[], &[]), 0.0);
    }

    #[test]
    fn test_regression_metrics() {
        let actual = [1.0, 2.0, 3.0];
        assert_eq!(mean_squared_error(&actual, &actual), 0.0);
        assert_eq!(r2_score(&actual, &actual), 1.0);
        assert_eq!(mean_squared_error(&actual, &[2.0, 2.0, 2.0]), 2.0 / 3.0);
        assert_eq!(r2_score(&actual, &[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_metric_display() {
        let m = Metric::Regression { mse: 1.5, r2: 0.25 };
        assert_eq!(m.to_string(), "mse=1.5000 r2=0.2500");
    }
}
