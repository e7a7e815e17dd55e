//! Fitted classifiers
//!
//! [`Classifier`] is the port the pipeline predicts through. [`LogisticModel`]
//! is a fitted linear model in either of its two shapes:
//!
//! - **Binary**: one coefficient row, two classes. `p = sigmoid(z)` is the
//!   probability of the second class, giving `[1 - p, p]`.
//! - **Multinomial**: one row per class, probabilities from a softmax.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::scaler::check_width;

/// Port for a fitted classifier
pub trait Classifier: Send + Sync {
    /// Number of columns the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Class labels, in probability column order
    fn classes(&self) -> &[String];

    /// Per-row probability distribution over [`Classifier::classes`]
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;

    /// Per-row index of the most probable class
    ///
    /// Ties go to the lowest index.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().into_iter().map(argmax).collect())
    }
}

/// Index of the largest value, first one winning ties
pub fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &p) in row.iter().enumerate() {
        if p > row[best] {
            best = i;
        }
    }
    best
}

/// Fitted logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LogisticModel {
    pub fn new(
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> std::result::Result<Self, ModelError> {
        let model = Self {
            classes,
            coefficients,
            intercepts,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check the parameters describe a binary or multinomial model
    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        if self.classes.len() < 2 {
            return Err(ModelError::LengthMismatch {
                what: "classes",
                expected: 2,
                actual: self.classes.len(),
            });
        }
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(class) {
                return Err(ModelError::DuplicateClass(class.clone()));
            }
        }

        let expected_rows = if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        };
        if self.coefficients.len() != expected_rows {
            return Err(ModelError::LengthMismatch {
                what: "coefficient rows",
                expected: expected_rows,
                actual: self.coefficients.len(),
            });
        }
        if self.intercepts.len() != expected_rows {
            return Err(ModelError::LengthMismatch {
                what: "intercepts",
                expected: expected_rows,
                actual: self.intercepts.len(),
            });
        }

        let width = self.coefficients[0].len();
        if width == 0 {
            return Err(ModelError::Empty("coefficients"));
        }
        for row in &self.coefficients {
            if row.len() != width {
                return Err(ModelError::LengthMismatch {
                    what: "coefficient row",
                    expected: width,
                    actual: row.len(),
                });
            }
            if !row.iter().all(|c| c.is_finite()) {
                return Err(ModelError::NonFinite("coefficients"));
            }
        }
        if !self.intercepts.iter().all(|b| b.is_finite()) {
            return Err(ModelError::NonFinite("intercepts"));
        }
        Ok(())
    }

    pub fn is_binary(&self) -> bool {
        self.coefficients.len() == 1
    }

    /// Linear scores `x . w + b`, one per coefficient row
    fn decision(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| row.iter().zip(w).map(|(x, w)| x * w).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_width("classifier", self.n_features(), x.ncols())?;

        let n_classes = self.classes.len();
        let mut proba = Array2::zeros((x.nrows(), n_classes));
        for (row, mut out) in x.rows().into_iter().zip(proba.rows_mut()) {
            let scores = self.decision(row);
            if self.is_binary() {
                let p = sigmoid(scores[0]);
                out[0] = 1.0 - p;
                out[1] = p;
            } else {
                for (o, p) in out.iter_mut().zip(softmax(&scores)) {
                    *o = p;
                }
            }
        }
        Ok(proba)
    }
}

/// Numerically stable sigmoid
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Softmax with the max subtracted before exponentiating
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
