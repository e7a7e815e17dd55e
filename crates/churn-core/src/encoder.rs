//! Categorical encoders
//!
//! The pipeline only needs two questions answered per feature: is there an
//! encoder for it, and what code does a category map to. [`CategoryEncoder`]
//! is that port; [`LabelEncoderSet`] is the fitted implementation.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::feature::{Feature, FeatureKind};

/// Port for per-feature categorical encoding
pub trait CategoryEncoder: Send + Sync {
    /// Whether `feature` has a registered encoder
    fn has_encoder(&self, feature: Feature) -> bool;

    /// Code for `category`, or `None` when it is unseen or no encoder exists
    fn encode(&self, feature: Feature, category: &str) -> Option<i64>;
}

/// Fitted label encoder: a category's code is its position in `classes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an encoder from fitted classes
    pub fn new(classes: Vec<String>) -> Result<Self, ModelError> {
        let encoder = Self { classes };
        encoder.validate()?;
        Ok(encoder)
    }

    /// Fit on a set of categories, sorting them the way label encoders do
    pub fn fit<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = categories.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Check the classes form a usable vocabulary
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Empty("encoder classes"));
        }
        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(ModelError::DuplicateClass(class.clone()));
            }
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn contains(&self, category: &str) -> bool {
        self.code(category).is_some()
    }

    pub fn code(&self, category: &str) -> Option<i64> {
        self.classes
            .iter()
            .position(|c| c == category)
            .map(|i| i as i64)
    }
}

/// One label encoder per categorical feature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEncoderSet {
    encoders: BTreeMap<Feature, LabelEncoder>,
}

impl LabelEncoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoders fitted on every categorical feature's form vocabulary
    pub fn from_vocabularies() -> Self {
        let mut set = Self::new();
        for feature in Feature::ALL {
            if feature.kind() == FeatureKind::Categorical {
                set.insert(feature, LabelEncoder::fit(feature.vocabulary().iter().copied()));
            }
        }
        set
    }

    /// Register an encoder, returning the one it replaces
    pub fn insert(&mut self, feature: Feature, encoder: LabelEncoder) -> Option<LabelEncoder> {
        self.encoders.insert(feature, encoder)
    }

    pub fn get(&self, feature: Feature) -> Option<&LabelEncoder> {
        self.encoders.get(&feature)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, &LabelEncoder)> + '_ {
        self.encoders.iter().map(|(f, e)| (*f, e))
    }
}

impl CategoryEncoder for LabelEncoderSet {
    fn has_encoder(&self, feature: Feature) -> bool {
        self.encoders.contains_key(&feature)
    }

    fn encode(&self, feature: Feature, category: &str) -> Option<i64> {
        self.encoders.get(&feature)?.code(category)
    }
}
