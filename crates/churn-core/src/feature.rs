//! Customer features and the record fed to the pipeline
//!
//! The attribute order below is the column order the scaler and classifier
//! were fitted on. Reordering [`Feature::ALL`] silently breaks every
//! artifact, so treat it as part of the artifact format.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Sentinel used by the six internet add-on features when the customer
/// has no internet service
pub const NO_INTERNET_SERVICE: &str = "No internet service";

/// A customer attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    SeniorCitizen,
    Partner,
    Dependents,
    TenureMonths,
    MultipleLines,
    InternetService,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    Contract,
    PaperlessBilling,
    PaymentMethod,
    MonthlyCharges,
    TotalCharges,
    Cltv,
}

/// Whether a feature carries a category or a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Categorical,
    Numeric,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Categorical => write!(f, "categorical"),
            FeatureKind::Numeric => write!(f, "numeric"),
        }
    }
}

impl Feature {
    /// Number of attributes in a record
    pub const COUNT: usize = 18;

    /// All features in fitted column order
    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::SeniorCitizen,
        Feature::Partner,
        Feature::Dependents,
        Feature::TenureMonths,
        Feature::MultipleLines,
        Feature::InternetService,
        Feature::OnlineSecurity,
        Feature::OnlineBackup,
        Feature::DeviceProtection,
        Feature::TechSupport,
        Feature::StreamingTv,
        Feature::StreamingMovies,
        Feature::Contract,
        Feature::PaperlessBilling,
        Feature::PaymentMethod,
        Feature::MonthlyCharges,
        Feature::TotalCharges,
        Feature::Cltv,
    ];

    /// Features that only make sense with an internet subscription
    pub const INTERNET_ADDONS: [Feature; 6] = [
        Feature::OnlineSecurity,
        Feature::OnlineBackup,
        Feature::DeviceProtection,
        Feature::TechSupport,
        Feature::StreamingTv,
        Feature::StreamingMovies,
    ];

    /// Column index in the encoded vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name, as used by the artifacts and input documents
    pub fn name(self) -> &'static str {
        match self {
            Feature::SeniorCitizen => "Senior Citizen",
            Feature::Partner => "Partner",
            Feature::Dependents => "Dependents",
            Feature::TenureMonths => "Tenure Months",
            Feature::MultipleLines => "Multiple Lines",
            Feature::InternetService => "Internet Service",
            Feature::OnlineSecurity => "Online Security",
            Feature::OnlineBackup => "Online Backup",
            Feature::DeviceProtection => "Device Protection",
            Feature::TechSupport => "Tech Support",
            Feature::StreamingTv => "Streaming TV",
            Feature::StreamingMovies => "Streaming Movies",
            Feature::Contract => "Contract",
            Feature::PaperlessBilling => "Paperless Billing",
            Feature::PaymentMethod => "Payment Method",
            Feature::MonthlyCharges => "Monthly Charges",
            Feature::TotalCharges => "Total Charges",
            Feature::Cltv => "CLTV",
        }
    }

    /// Look up a feature by name
    ///
    /// Matching ignores case and treats `_`, `-` and spaces alike, so
    /// `"tenure_months"` and `"Tenure Months"` name the same feature.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = canonical(name);
        Self::ALL
            .iter()
            .copied()
            .find(|f| canonical(f.name()) == wanted)
    }

    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::TenureMonths
            | Feature::MonthlyCharges
            | Feature::TotalCharges
            | Feature::Cltv => FeatureKind::Numeric,
            _ => FeatureKind::Categorical,
        }
    }

    /// Categories a form offers for this feature (empty for numeric features)
    pub fn vocabulary(self) -> &'static [&'static str] {
        const ADDON: &[&str] = &["No", NO_INTERNET_SERVICE, "Yes"];
        match self {
            Feature::SeniorCitizen | Feature::Dependents => &["No", "Yes"],
            Feature::Partner | Feature::PaperlessBilling => &["Yes", "No"],
            Feature::MultipleLines => &["No", "Yes", "No phone service"],
            Feature::InternetService => &["Fiber optic", "No", "DSL"],
            Feature::OnlineSecurity
            | Feature::OnlineBackup
            | Feature::DeviceProtection
            | Feature::TechSupport
            | Feature::StreamingTv
            | Feature::StreamingMovies => ADDON,
            Feature::Contract => &["Two year", "One year", "Month-to-month"],
            Feature::PaymentMethod => &[
                "Credit card (automatic)",
                "Mailed check",
                "Bank transfer (automatic)",
                "Electronic check",
            ],
            Feature::TenureMonths
            | Feature::MonthlyCharges
            | Feature::TotalCharges
            | Feature::Cltv => &[],
        }
    }

    /// Value used when the caller leaves this feature unset
    pub fn default_value(self) -> FeatureValue {
        match self {
            Feature::Contract => FeatureValue::from("Month-to-month"),
            Feature::PaymentMethod => FeatureValue::from("Bank transfer (automatic)"),
            f if f.kind() == FeatureKind::Numeric => FeatureValue::Numeric(0.0),
            _ => FeatureValue::from("No"),
        }
    }

    pub fn is_internet_addon(self) -> bool {
        Self::INTERNET_ADDONS.contains(&self)
    }
}

fn canonical(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Numeric(_) => FeatureKind::Numeric,
            FeatureValue::Categorical(_) => FeatureKind::Categorical,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Categorical(s) => Some(s),
            FeatureValue::Numeric(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(x) => Some(*x),
            FeatureValue::Categorical(_) => None,
        }
    }

    /// True when this is the category `s`
    pub fn is_category(&self, s: &str) -> bool {
        self.as_category() == Some(s)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Categorical(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Categorical(s)
    }
}

impl From<f64> for FeatureValue {
    fn from(x: f64) -> Self {
        FeatureValue::Numeric(x)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Numeric(x) => write!(f, "{}", x),
            FeatureValue::Categorical(s) => f.write_str(s),
        }
    }
}

/// Complete, ordered set of feature values for one prediction
///
/// Records are built by [`crate::normalize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: Vec<FeatureValue>,
}

impl FeatureRecord {
    /// Build a record from values laid out in [`Feature::ALL`] order
    pub(crate) fn from_ordered(values: Vec<FeatureValue>) -> Self {
        debug_assert_eq!(values.len(), Feature::COUNT);
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> &FeatureValue {
        &self.values[feature.index()]
    }

    /// Iterate over features in fitted column order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &FeatureValue)> + '_ {
        Feature::ALL.iter().copied().zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_order() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_from_name_variants() {
        assert_eq!(Feature::from_name("Tenure Months"), Some(Feature::TenureMonths));
        assert_eq!(Feature::from_name("tenure_months"), Some(Feature::TenureMonths));
        assert_eq!(Feature::from_name("streaming-tv"), Some(Feature::StreamingTv));
        assert_eq!(Feature::from_name("cltv"), Some(Feature::Cltv));
        assert_eq!(Feature::from_name("Churn Label"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
    }

    #[test]
    fn test_kinds_and_vocabularies() {
        let numeric: Vec<_> = Feature::ALL
            .iter()
            .filter(|f| f.kind() == FeatureKind::Numeric)
            .collect();
        assert_eq!(numeric.len(), 4);
        for feature in Feature::ALL {
            match feature.kind() {
                FeatureKind::Numeric => assert!(feature.vocabulary().is_empty()),
                FeatureKind::Categorical => assert!(feature.vocabulary().len() >= 2),
            }
        }
    }

    #[test]
    fn test_defaults_are_in_vocabulary() {
        for feature in Feature::ALL {
            match feature.default_value() {
                FeatureValue::Categorical(s) => {
                    assert!(feature.vocabulary().contains(&s.as_str()), "{feature}: {s}")
                }
                FeatureValue::Numeric(x) => assert_eq!(x, 0.0),
            }
        }
    }

    #[test]
    fn test_addons_offer_sentinel() {
        for feature in Feature::INTERNET_ADDONS {
            assert!(feature.is_internet_addon());
            assert!(feature.vocabulary().contains(&NO_INTERNET_SERVICE));
        }
        assert!(!Feature::InternetService.is_internet_addon());
    }

    #[test]
    fn test_value_deserialize_untagged() {
        let number: FeatureValue = serde_json::from_str("12").unwrap();
        assert_eq!(number, FeatureValue::Numeric(12.0));
        let category: FeatureValue = serde_json::from_str("\"DSL\"").unwrap();
        assert_eq!(category, FeatureValue::from("DSL"));
    }
}
