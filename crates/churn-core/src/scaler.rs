//! Fitted numeric scalers

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, ModelError, Result};

/// Port for the column-wise transform applied to the encoded matrix
pub trait Scaler: Send + Sync {
    /// Number of columns the scaler was fitted on
    fn n_features(&self) -> usize;

    /// Scale every row of `x`, returning a matrix of the same shape
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Standardization: `(x - mean) / scale`
///
/// A zero scale marks a constant column and is treated as 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> std::result::Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        check_columns("mean", &self.mean, "scale", &self.scale)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_width("scaler", self.n_features(), x.ncols())?;
        let mean = Array1::from(self.mean.clone());
        let scale: Array1<f64> = self
            .scale
            .iter()
            .map(|&s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok((&x - &mean) / &scale)
    }
}

/// Range scaling: `x * scale + min`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: Vec<f64>,
    scale: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> std::result::Result<Self, ModelError> {
        let scaler = Self { min, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        check_columns("min", &self.min, "scale", &self.scale)
    }
}

impl Scaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_width("scaler", self.n_features(), x.ncols())?;
        let min = Array1::from(self.min.clone());
        let scale = Array1::from(self.scale.clone());
        Ok(&x * &scale + &min)
    }
}

/// Any scaler that can be loaded from an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl FittedScaler {
    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        match self {
            FittedScaler::Standard(s) => s.validate(),
            FittedScaler::MinMax(s) => s.validate(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FittedScaler::Standard(_) => "standard",
            FittedScaler::MinMax(_) => "min_max",
        }
    }
}

impl Scaler for FittedScaler {
    fn n_features(&self) -> usize {
        match self {
            FittedScaler::Standard(s) => s.n_features(),
            FittedScaler::MinMax(s) => s.n_features(),
        }
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        match self {
            FittedScaler::Standard(s) => s.transform(x),
            FittedScaler::MinMax(s) => s.transform(x),
        }
    }
}

pub(crate) fn check_width(stage: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(InferenceError::ShapeMismatch {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_columns(
    offset_name: &'static str,
    offset: &[f64],
    scale_name: &'static str,
    scale: &[f64],
) -> std::result::Result<(), ModelError> {
    if offset.is_empty() {
        return Err(ModelError::Empty(offset_name));
    }
    if scale.len() != offset.len() {
        return Err(ModelError::LengthMismatch {
            what: scale_name,
            expected: offset.len(),
            actual: scale.len(),
        });
    }
    if !offset.iter().all(|x| x.is_finite()) {
        return Err(ModelError::NonFinite(offset_name));
    }
    if !scale.iter().all(|x| x.is_finite()) {
        return Err(ModelError::NonFinite(scale_name));
    }
    Ok(())
}
