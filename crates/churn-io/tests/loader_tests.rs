//! Artifact loading integration tests

mod common;

use std::fs;

use churn_core::{normalize, Feature, RawSelections, NO_INTERNET_SERVICE, PROBABILITY_TOLERANCE};
use churn_io::{load_pipeline, ArtifactError, ArtifactPaths};
use rstest::rstest;
use tempfile::TempDir;

fn dsl_customer() -> RawSelections {
    RawSelections::new()
        .with(Feature::Partner, "Yes")
        .with(Feature::TenureMonths, 12.0)
        .with(Feature::InternetService, "DSL")
        .with(Feature::OnlineSecurity, "Yes")
        .with(Feature::PaperlessBilling, "Yes")
        .with(Feature::PaymentMethod, "Electronic check")
        .with(Feature::MonthlyCharges, 70.0)
        .with(Feature::TotalCharges, 840.0)
        .with(Feature::Cltv, 3000.0)
}

#[test]
fn test_load_fixture_pipeline() {
    let pipeline = load_pipeline(&ArtifactPaths::in_dir(&common::artifact_dir())).unwrap();

    // The target column's encoder is not a feature
    assert_eq!(pipeline.encoders().len(), 14);

    let prediction = pipeline.predict(&normalize(&dsl_customer())).unwrap();
    assert_eq!(prediction.classes(), &["No", "Yes"]);
    assert!(prediction.label() == "No" || prediction.label() == "Yes");
    let sum: f64 = prediction.probabilities().iter().sum();
    assert!((sum - 1.0).abs() < PROBABILITY_TOLERANCE);
}

#[test]
fn test_fixture_encodes_sentinel() {
    let pipeline = load_pipeline(&ArtifactPaths::in_dir(&common::artifact_dir())).unwrap();
    let record = normalize(&dsl_customer().with(Feature::InternetService, "No"));
    let encoded = pipeline.encode(&record).unwrap();

    for addon in Feature::INTERNET_ADDONS {
        assert!(record.get(addon).is_category(NO_INTERNET_SERVICE));
        assert_eq!(encoded[addon.index()], 1.0);
    }
    assert_eq!(encoded[Feature::InternetService.index()], 2.0);
}

#[test]
fn test_zero_customer_predicts() {
    let pipeline = load_pipeline(&ArtifactPaths::in_dir(&common::artifact_dir())).unwrap();
    let prediction = pipeline.predict(&normalize(&RawSelections::new())).unwrap();
    assert!(prediction.probabilities().iter().all(|p| p.is_finite()));
}

#[rstest]
#[case("model.json")]
#[case("scaler.json")]
#[case("label_encoders.json")]
fn test_missing_artifact_is_fatal(#[case] name: &str) {
    let dir = TempDir::new().unwrap();
    common::copy_artifacts(dir.path());
    fs::remove_file(dir.path().join(name)).unwrap();

    let err = load_pipeline(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, ArtifactError::NotFound { .. }));
    assert!(err.to_string().contains(name), "{}", err);
    assert_eq!(err.path(), Some(dir.path().join(name).as_path()));
}

#[test]
fn test_corrupt_artifact_is_fatal() {
    let dir = TempDir::new().unwrap();
    common::copy_artifacts(dir.path());
    fs::write(dir.path().join("scaler.json"), b"\x00\x01 pickle?").unwrap();

    let err = load_pipeline(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, ArtifactError::Malformed { .. }));
}

#[test]
fn test_width_mismatch_is_misconfiguration() {
    let dir = TempDir::new().unwrap();
    common::copy_artifacts(dir.path());
    fs::write(
        dir.path().join("scaler.json"),
        r#"{"kind": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]}"#,
    )
    .unwrap();

    let err = load_pipeline(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
    match err {
        ArtifactError::Misconfigured(inner) => assert!(inner.is_fatal()),
        other => panic!("expected misconfiguration, got {other}"),
    }
}
