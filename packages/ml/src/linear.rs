//! Logistic regression classifier
//!
//! Multinomial: one coefficient row per class, probabilities via softmax.
//! Binary exports carry a single row for the positive (second) class and use the sigmoid.

use fauna_types::{Result, bail};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogisticRegression {
    /// `n_rows × n_features`, rows are classes (or the single positive class)
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        if n_classes < 2 {
            bail!("logistic regression needs at least two classes, got {n_classes}");
        }
        let rows = self.coefficients.len();
        let expected_rows = if n_classes == 2 && rows == 1 { 1 } else { n_classes };
        if rows != expected_rows {
            bail!("expected {expected_rows} coefficient rows for {n_classes} classes, got {rows}");
        }
        if self.intercepts.len() != rows {
            bail!(
                "expected {rows} intercepts, got {}",
                self.intercepts.len()
            );
        }
        for (i, row) in self.coefficients.iter().enumerate() {
            if row.len() != n_features {
                bail!(
                    "coefficient row {i} has {} entries, expected {n_features}",
                    row.len()
                );
            }
        }
        if self
            .coefficients
            .iter()
            .flatten()
            .chain(self.intercepts.iter())
            .any(|v| !v.is_finite())
        {
            bail!("coefficients and intercepts must be finite");
        }
        Ok(())
    }

    fn weights(&self) -> Result<Array2<f64>> {
        let rows = self.coefficients.len();
        let cols = self.coefficients.first().map(Vec::len).unwrap_or(0);
        let flat: Vec<f64> = self.coefficients.iter().flatten().copied().collect();
        Ok(Array2::from_shape_vec((rows, cols), flat)?)
    }

    pub fn decision_function(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        let weights = self.weights()?;
        if weights.ncols() != x.len() {
            bail!(
                "model expects {} features, got {}",
                weights.ncols(),
                x.len()
            );
        }
        Ok(weights.dot(&x) + &Array1::from(self.intercepts.clone()))
    }

    pub fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        let scores = self.decision_function(x)?;
        // a single row only passes validation for two classes
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            return Ok(Array1::from(vec![1.0 - p, p]));
        }
        Ok(softmax(&scores))
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(scores: &Array1<f64>) -> Array1<f64> {
    let max = scores.fold(f64::NEG_INFINITY, |m, v| m.max(*v));
    let exp = scores.mapv(|v| (v - max).exp());
    let total = exp.sum();
    exp / total
}
