//! Error types for churn-core

use thiserror::Error;

use crate::feature::Feature;

/// Result type alias for inference operations
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Failure while encoding, scaling or classifying one record
///
/// These are scoped to a single request. Only [`InferenceError::ShapeMismatch`]
/// points at the artifacts themselves; see [`InferenceError::is_fatal`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// Category outside the encoder's vocabulary that cannot be read as an integer
    #[error("Unseen category for '{feature}': '{value}' is not a known class and is not an integer")]
    UnseenCategory { feature: Feature, value: String },

    /// A numeric feature carried something other than a finite number
    #[error("Non-numeric value for '{feature}': '{value}'")]
    NonNumericValue { feature: Feature, value: String },

    /// An artifact was fitted on a different number of columns
    #[error("Shape mismatch in {stage}: expected {expected} features, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The classifier produced something that is not a probability distribution
    #[error("Invalid classifier output: {0}")]
    InvalidOutput(String),
}

impl InferenceError {
    /// Whether this error means the loaded artifacts are unusable
    ///
    /// Fatal errors repeat for every request and must not be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, InferenceError::ShapeMismatch { .. })
    }
}

/// Fitted parameters that cannot describe a working encoder, scaler or model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Empty parameters: {0}")]
    Empty(&'static str),

    #[error("Duplicate class '{0}'")]
    DuplicateClass(String),

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}

/// A name that does not match any [`Feature`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown feature: {0}")]
pub struct UnknownFeature(pub String);
