//! Encoding and inference pipeline
//!
//! For one [`FeatureRecord`]:
//! 1. encode each feature in fitted column order
//! 2. treat the vector as a 1 x N matrix and scale it
//! 3. ask the classifier for class probabilities
//!
//! Unseen categories do not fail the request. The raw value is read as an
//! integer code instead, which may collide with a real class's code. Only a
//! value that cannot be read as an integer at all is an error.

use ndarray::Array2;
use serde::Serialize;

use crate::classifier::Classifier;
use crate::encoder::CategoryEncoder;
use crate::error::{InferenceError, Result};
use crate::feature::{Feature, FeatureRecord, FeatureValue};
use crate::scaler::Scaler;

/// Allowed distance of a probability vector's sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Outcome of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    label: String,
    class_index: usize,
    classes: Vec<String>,
    probabilities: Vec<f64>,
}

impl Prediction {
    /// Predicted class and the full distribution over `classes`
    ///
    /// `class_index` must point into `classes`, and `probabilities` must have
    /// one entry per class.
    pub fn new(class_index: usize, classes: Vec<String>, probabilities: Vec<f64>) -> Result<Self> {
        if probabilities.len() != classes.len() {
            return Err(InferenceError::InvalidOutput(format!(
                "{} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }
        let label = classes.get(class_index).cloned().ok_or_else(|| {
            InferenceError::InvalidOutput(format!(
                "predicted class {} of {}",
                class_index,
                classes.len()
            ))
        })?;
        Ok(Self {
            label,
            class_index,
            classes,
            probabilities,
        })
    }

    /// Predicted class label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Position of the label in [`Prediction::classes`]
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Class labels in the classifier's order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Probability per class, same order as the classes
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability assigned to `label`
    pub fn probability_of(&self, label: &str) -> Option<f64> {
        self.classes
            .iter()
            .position(|c| c == label)
            .and_then(|i| self.probabilities.get(i).copied())
    }

    /// `(label, probability)` pairs in class order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.classes
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }

    /// Probability of the predicted class
    pub fn confidence(&self) -> f64 {
        self.probabilities
            .get(self.class_index)
            .copied()
            .unwrap_or_default()
    }
}

/// Encode a record into a numeric vector, one entry per feature
pub fn encode_features<E>(record: &FeatureRecord, encoders: &E) -> Result<Vec<f64>>
where
    E: CategoryEncoder + ?Sized,
{
    record
        .iter()
        .map(|(feature, value)| encode_value(feature, value, encoders))
        .collect()
}

fn encode_value<E>(feature: Feature, value: &FeatureValue, encoders: &E) -> Result<f64>
where
    E: CategoryEncoder + ?Sized,
{
    if !encoders.has_encoder(feature) {
        return match value {
            FeatureValue::Numeric(x) => Ok(*x),
            FeatureValue::Categorical(s) => Err(InferenceError::NonNumericValue {
                feature,
                value: s.clone(),
            }),
        };
    }

    let code = match value {
        FeatureValue::Categorical(s) => match encoders.encode(feature, s) {
            Some(code) => {
                tracing::trace!("Encoding '{}': '{}' -> {}", feature, s, code);
                code
            }
            None => unseen_code(feature, value)?,
        },
        FeatureValue::Numeric(_) => unseen_code(feature, value)?,
    };
    Ok(code as f64)
}

/// Fallback code for a value outside the encoder's vocabulary
///
/// Strings must read as an integer; numbers are truncated toward zero.
pub fn unseen_code(feature: Feature, value: &FeatureValue) -> Result<i64> {
    let code = match value {
        FeatureValue::Categorical(s) => s.trim().parse::<i64>().ok(),
        FeatureValue::Numeric(x) if x.is_finite() => Some(x.trunc() as i64),
        FeatureValue::Numeric(_) => None,
    };

    match code {
        Some(code) => {
            tracing::warn!("Unseen category for '{}': '{}' -> {}", feature, value, code);
            Ok(code)
        }
        None => {
            tracing::warn!("Unseen category for '{}': '{}' has no integer code", feature, value);
            Err(InferenceError::UnseenCategory {
                feature,
                value: value.to_string(),
            })
        }
    }
}

/// Fitted encoders, scaler and classifier, shared read-only by every request
#[derive(Debug, Clone)]
pub struct Pipeline<E, S, C> {
    encoders: E,
    scaler: S,
    classifier: C,
}

impl<E, S, C> Pipeline<E, S, C>
where
    E: CategoryEncoder,
    S: Scaler,
    C: Classifier,
{
    pub fn new(encoders: E, scaler: S, classifier: C) -> Self {
        Self {
            encoders,
            scaler,
            classifier,
        }
    }

    /// Check the scaler and classifier were fitted on the record's width
    ///
    /// Run once after loading; a failure here repeats on every request.
    pub fn check_shapes(&self) -> Result<()> {
        for (stage, width) in [
            ("scaler", self.scaler.n_features()),
            ("classifier", self.classifier.n_features()),
        ] {
            if width != Feature::COUNT {
                return Err(InferenceError::ShapeMismatch {
                    stage,
                    expected: width,
                    actual: Feature::COUNT,
                });
            }
        }
        Ok(())
    }

    pub fn encoders(&self) -> &E {
        &self.encoders
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Encoded feature vector for `record`
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        encode_features(record, &self.encoders)
    }

    /// Predict the class and class probabilities for `record`
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction> {
        tracing::debug!("Raw features: {:?}", record);

        let encoded = self.encode(record)?;
        tracing::debug!("Encoded features: {:?}", encoded);

        let n = encoded.len();
        let matrix = Array2::from_shape_vec((1, n), encoded).map_err(|_| {
            InferenceError::ShapeMismatch {
                stage: "encoder",
                expected: Feature::COUNT,
                actual: n,
            }
        })?;

        let scaled = self.scaler.transform(matrix.view())?;
        tracing::debug!("Scaled features: {:?}", scaled.row(0).to_vec());

        let proba = self.classifier.predict_proba(scaled.view())?;
        let probabilities = proba.row(0).to_vec();
        check_distribution(&probabilities, self.classifier.classes().len())?;

        let class_index = self
            .classifier
            .predict(scaled.view())?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InvalidOutput("no predicted class".to_string()))?;
        let prediction = Prediction::new(
            class_index,
            self.classifier.classes().to_vec(),
            probabilities,
        )?;
        tracing::debug!(
            "Prediction: {} ({:?})",
            prediction.label(),
            prediction.probabilities()
        );
        Ok(prediction)
    }
}

fn check_distribution(probabilities: &[f64], n_classes: usize) -> Result<()> {
    if probabilities.len() != n_classes {
        return Err(InferenceError::InvalidOutput(format!(
            "{} probabilities for {} classes",
            probabilities.len(),
            n_classes
        )));
    }
    if let Some(p) = probabilities
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(InferenceError::InvalidOutput(format!(
            "probability {} outside [0, 1]",
            p
        )));
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(InferenceError::InvalidOutput(format!(
            "probabilities sum to {}",
            sum
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::LabelEncoderSet;
    use crate::normalize::{normalize, RawSelections};

    #[test]
    fn test_unseen_code_integer_string() {
        let code = unseen_code(Feature::Contract, &FeatureValue::from(" 7 ")).unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_unseen_code_truncates_numbers() {
        assert_eq!(unseen_code(Feature::Partner, &FeatureValue::Numeric(2.9)).unwrap(), 2);
        assert_eq!(unseen_code(Feature::Partner, &FeatureValue::Numeric(-1.5)).unwrap(), -1);
    }

    #[test]
    fn test_unseen_code_rejects_text() {
        let err = unseen_code(Feature::Contract, &FeatureValue::from("Weekly")).unwrap_err();
        assert_eq!(
            err,
            InferenceError::UnseenCategory {
                feature: Feature::Contract,
                value: "Weekly".to_string()
            }
        );
        // Float-looking strings are not integers
        assert!(unseen_code(Feature::Contract, &FeatureValue::from("2.5")).is_err());
        assert!(unseen_code(Feature::Contract, &FeatureValue::Numeric(f64::NAN)).is_err());
    }

    #[test]
    fn test_encode_default_record() {
        let record = normalize(&RawSelections::new());
        let encoded = encode_features(&record, &LabelEncoderSet::from_vocabularies()).unwrap();

        assert_eq!(encoded.len(), Feature::COUNT);
        // "No" sorts before "Yes"
        assert_eq!(encoded[Feature::SeniorCitizen.index()], 0.0);
        // Internet service "No" sorts after "DSL" and "Fiber optic"
        assert_eq!(encoded[Feature::InternetService.index()], 2.0);
        assert_eq!(encoded[Feature::OnlineSecurity.index()], 1.0);
        assert_eq!(encoded[Feature::TenureMonths.index()], 0.0);
    }

    #[test]
    fn test_encode_rejects_text_in_numeric_slot() {
        let record = normalize(&RawSelections::new().with(Feature::MonthlyCharges, "seventy"));
        let err = encode_features(&record, &LabelEncoderSet::from_vocabularies()).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::NonNumericValue {
                feature: Feature::MonthlyCharges,
                ..
            }
        ));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_check_distribution() {
        assert!(check_distribution(&[0.25, 0.75], 2).is_ok());
        assert!(check_distribution(&[0.5, 0.6], 2).is_err());
        assert!(check_distribution(&[1.0], 2).is_err());
        assert!(check_distribution(&[f64::NAN, 1.0], 2).is_err());
    }

    #[test]
    fn test_prediction_accessors() {
        let prediction = Prediction::new(
            1,
            vec!["No".to_string(), "Yes".to_string()],
            vec![0.3, 0.7],
        )
        .unwrap();
        assert_eq!(prediction.label(), "Yes");
        assert_eq!(prediction.probability_of("No"), Some(0.3));
        assert_eq!(prediction.probability_of("Maybe"), None);
        assert_eq!(prediction.confidence(), 0.7);
        let pairs: Vec<_> = prediction.iter().collect();
        assert_eq!(pairs, vec![("No", 0.3), ("Yes", 0.7)]);
    }

    #[test]
    fn test_prediction_rejects_inconsistent_parts() {
        let classes = vec!["No".to_string(), "Yes".to_string()];
        let err = Prediction::new(2, classes.clone(), vec![0.5, 0.5]).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));

        let err = Prediction::new(0, classes, vec![1.0]).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidOutput(_)));
    }
}
