//! Text rendering for predictions and the feature listing

use std::fmt::Write;

use churn_core::{Advisory, Feature, FeatureRecord, Prediction};
use serde::Serialize;

/// Width of a full-probability bar in characters
const BAR_WIDTH: usize = 40;

/// Predicted class followed by one bar per class
pub fn render_prediction(prediction: &Prediction) -> String {
    let mut out = String::new();
    let label_width = prediction
        .classes()
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "Predicted Class: {}", prediction.label());
    let _ = writeln!(out, "Prediction Probabilities:");
    for (label, p) in prediction.iter() {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>6.4}  {}",
            label,
            p,
            bar(p),
            width = label_width
        );
    }
    out
}

fn bar(p: f64) -> String {
    let filled = (p.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

/// Features in fitted order with their kind, choices and default
pub fn render_features() -> String {
    let mut out = String::new();
    for feature in Feature::ALL {
        let choices = if feature.vocabulary().is_empty() {
            ">= 0".to_string()
        } else {
            feature.vocabulary().join(" | ")
        };
        let _ = writeln!(
            out,
            "{:>2}  {:<18} {:<12} default: {:<26} {}",
            feature.index(),
            feature.name(),
            feature.kind().to_string(),
            feature.default_value().to_string(),
            choices
        );
    }
    out
}

/// Machine-readable prediction output
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub record: &'a FeatureRecord,
    pub prediction: &'a Prediction,
    pub advisories: Vec<String>,
}

impl<'a> JsonReport<'a> {
    pub fn new(record: &'a FeatureRecord, prediction: &'a Prediction, advisories: &[Advisory]) -> Self {
        Self {
            record,
            prediction,
            advisories: advisories.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::{normalize, RawSelections};

    fn prediction() -> Prediction {
        Prediction::new(
            0,
            vec!["No".to_string(), "Yes".to_string()],
            vec![0.75, 0.25],
        )
        .unwrap()
    }

    #[test]
    fn test_render_prediction() {
        let text = render_prediction(&prediction());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Predicted Class: No");
        assert_eq!(lines[1], "Prediction Probabilities:");
        assert!(lines[2].starts_with("  No   0.7500  "));
        assert_eq!(lines[2].matches('█').count(), 30);
        assert_eq!(lines[3].matches('█').count(), 10);
    }

    #[test]
    fn test_bar_bounds() {
        assert_eq!(bar(0.0), "");
        assert_eq!(bar(1.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1.5).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_render_features_lists_all() {
        let text = render_features();
        assert_eq!(text.lines().count(), Feature::COUNT);
        assert!(text.contains("Month-to-month"));
        assert!(text.lines().last().unwrap().contains("CLTV"));
    }

    #[test]
    fn test_json_report() {
        let record = normalize(&RawSelections::new().with(Feature::TenureMonths, -3.0));
        let advisories = churn_core::validate(&record);
        let prediction = prediction();
        let report = JsonReport::new(&record, &prediction, &advisories);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["record"]["Tenure Months"], -3.0);
        assert_eq!(json["prediction"]["label"], "No");
        assert_eq!(json["advisories"].as_array().unwrap().len(), 1);
    }
}
