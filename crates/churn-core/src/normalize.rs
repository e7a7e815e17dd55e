//! Feature normalizer
//!
//! Turns whatever the caller selected into a complete [`FeatureRecord`]:
//! - unset features take their defaults
//! - the six internet add-ons collapse to "No internet service" when the
//!   customer has no internet service
//!
//! Normalization never rejects input. [`validate`] reports what the input
//! layer should have caught, but the record is still predicted on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownFeature;
use crate::feature::{Feature, FeatureKind, FeatureRecord, FeatureValue, NO_INTERNET_SERVICE};

/// Values selected by the caller, any of which may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, FeatureValue>",
    into = "BTreeMap<String, FeatureValue>"
)]
pub struct RawSelections {
    values: BTreeMap<Feature, FeatureValue>,
}

impl RawSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier selection
    pub fn set(&mut self, feature: Feature, value: impl Into<FeatureValue>) {
        self.values.insert(feature, value.into());
    }

    /// Builder-style [`RawSelections::set`]
    pub fn with(mut self, feature: Feature, value: impl Into<FeatureValue>) -> Self {
        self.set(feature, value);
        self
    }

    pub fn get(&self, feature: Feature) -> Option<&FeatureValue> {
        self.values.get(&feature)
    }

    pub fn remove(&mut self, feature: Feature) -> Option<FeatureValue> {
        self.values.remove(&feature)
    }

    /// Overlay `other` on top of these selections
    pub fn merge(&mut self, other: RawSelections) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Selected value, or the feature's default
    fn value_or_default(&self, feature: Feature) -> FeatureValue {
        self.values
            .get(&feature)
            .cloned()
            .unwrap_or_else(|| feature.default_value())
    }
}

impl TryFrom<BTreeMap<String, FeatureValue>> for RawSelections {
    type Error = UnknownFeature;

    fn try_from(map: BTreeMap<String, FeatureValue>) -> Result<Self, Self::Error> {
        let mut selections = RawSelections::new();
        for (name, value) in map {
            let feature = Feature::from_name(&name).ok_or(UnknownFeature(name))?;
            selections.set(feature, value);
        }
        Ok(selections)
    }
}

impl From<RawSelections> for BTreeMap<String, FeatureValue> {
    fn from(selections: RawSelections) -> Self {
        selections
            .values
            .into_iter()
            .map(|(feature, value)| (feature.name().to_string(), value))
            .collect()
    }
}

/// Build the complete record for one prediction
pub fn normalize(raw: &RawSelections) -> FeatureRecord {
    let no_internet = raw
        .value_or_default(Feature::InternetService)
        .is_category("No");

    let values = Feature::ALL
        .iter()
        .map(|&feature| {
            if no_internet && feature.is_internet_addon() {
                FeatureValue::from(NO_INTERNET_SERVICE)
            } else {
                raw.value_or_default(feature)
            }
        })
        .collect();

    FeatureRecord::from_ordered(values)
}

/// Something about a record the input layer would normally prevent
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// Category the form does not offer for this feature
    OutOfVocabulary { feature: Feature, value: String },
    /// Value of the wrong kind for this feature
    WrongKind {
        feature: Feature,
        expected: FeatureKind,
    },
    /// Numeric value below zero
    Negative { feature: Feature, value: f64 },
    /// Numeric value that is NaN or infinite
    NonFinite { feature: Feature },
    /// Total charges lower than one month's charges
    TotalBelowMonthly { total: f64, monthly: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::OutOfVocabulary { feature, value } => {
                write!(f, "'{}' is not an offered value for '{}'", value, feature)
            }
            Advisory::WrongKind { feature, expected } => {
                write!(f, "'{}' expects a {} value", feature, expected)
            }
            Advisory::Negative { feature, value } => {
                write!(f, "'{}' is negative ({})", feature, value)
            }
            Advisory::NonFinite { feature } => write!(f, "'{}' is not a finite number", feature),
            Advisory::TotalBelowMonthly { total, monthly } => write!(
                f,
                "Total Charges ({}) is below Monthly Charges ({})",
                total, monthly
            ),
        }
    }
}

/// Check a record against the form's vocabularies and numeric bounds
pub fn validate(record: &FeatureRecord) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    for (feature, value) in record.iter() {
        match (feature.kind(), value) {
            (FeatureKind::Categorical, FeatureValue::Categorical(s)) => {
                if !feature.vocabulary().contains(&s.as_str()) {
                    advisories.push(Advisory::OutOfVocabulary {
                        feature,
                        value: s.clone(),
                    });
                }
            }
            (FeatureKind::Numeric, FeatureValue::Numeric(x)) => {
                if !x.is_finite() {
                    advisories.push(Advisory::NonFinite { feature });
                } else if *x < 0.0 {
                    advisories.push(Advisory::Negative { feature, value: *x });
                }
            }
            (expected, _) => advisories.push(Advisory::WrongKind { feature, expected }),
        }
    }

    if let (Some(total), Some(monthly)) = (
        record.get(Feature::TotalCharges).as_number(),
        record.get(Feature::MonthlyCharges).as_number(),
    ) {
        if total < monthly {
            advisories.push(Advisory::TotalBelowMonthly { total, monthly });
        }
    }

    advisories
}
