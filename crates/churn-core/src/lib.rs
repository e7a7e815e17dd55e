//! churn-core - Customer churn prediction core
//!
//! This crate turns a customer's attributes into a churn prediction:
//!
//! - **Feature Normalizer**: fills defaults and applies the internet add-on
//!   rule, producing an immutable [`FeatureRecord`]
//! - **Encoding & Inference Pipeline**: label-encodes categories, scales the
//!   vector and asks a classifier for class probabilities
//!
//! # Design
//!
//! The fitted encoders, scaler and classifier sit behind the
//! [`CategoryEncoder`], [`Scaler`] and [`Classifier`] traits. They are loaded
//! once and only ever read, so one [`Pipeline`] can serve any number of
//! requests. Each request owns its record and vectors.
//!
//! ```
//! use churn_core::{normalize, Feature, LabelEncoderSet, LogisticModel, Pipeline, RawSelections,
//!     StandardScaler};
//!
//! let n = Feature::COUNT;
//! let pipeline = Pipeline::new(
//!     LabelEncoderSet::from_vocabularies(),
//!     StandardScaler::new(vec![0.0; n], vec![1.0; n]).unwrap(),
//!     LogisticModel::new(vec!["No".into(), "Yes".into()], vec![vec![0.1; n]], vec![0.0]).unwrap(),
//! );
//!
//! let raw = RawSelections::new()
//!     .with(Feature::InternetService, "DSL")
//!     .with(Feature::TenureMonths, 12.0);
//! let prediction = pipeline.predict(&normalize(&raw)).unwrap();
//! assert_eq!(prediction.probabilities().len(), 2);
//! ```

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod feature;
pub mod normalize;
pub mod pipeline;
pub mod scaler;

pub use classifier::{Classifier, LogisticModel};
pub use encoder::{CategoryEncoder, LabelEncoder, LabelEncoderSet};
pub use error::{InferenceError, ModelError, Result, UnknownFeature};
pub use feature::{Feature, FeatureKind, FeatureRecord, FeatureValue, NO_INTERNET_SERVICE};
pub use normalize::{normalize, validate, Advisory, RawSelections};
pub use pipeline::{encode_features, unseen_code, Pipeline, Prediction, PROBABILITY_TOLERANCE};
pub use scaler::{FittedScaler, MinMaxScaler, Scaler, StandardScaler};
