//! Readers for the three fitted artifacts
//!
//! All artifacts are JSON documents:
//!
//! ```json
//! // label_encoders.json
//! { "Partner": { "classes": ["No", "Yes"] }, "Contract": { "classes": [...] } }
//!
//! // scaler.json
//! { "kind": "standard", "mean": [...], "scale": [...] }
//!
//! // model.json
//! { "classes": ["No", "Yes"], "coefficients": [[...]], "intercepts": [-0.4] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use churn_core::{Feature, FittedScaler, LabelEncoder, LabelEncoderSet, LogisticModel};
use serde::de::DeserializeOwned;

use crate::error::{ArtifactError, ArtifactResult};

/// The three artifacts a pipeline needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
    Encoders,
}

impl ArtifactKind {
    /// File name used when the config does not name one
    pub fn default_file_name(self) -> &'static str {
        match self {
            ArtifactKind::Model => "model.json",
            ArtifactKind::Scaler => "scaler.json",
            ArtifactKind::Encoders => "label_encoders.json",
        }
    }
}

/// Read and deserialize a JSON artifact
pub fn read_json<T: DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the label encoders
///
/// Keys that do not name a feature, such as an encoder fitted on the
/// target column, are skipped.
pub fn open_encoders(path: &Path) -> ArtifactResult<LabelEncoderSet> {
    let raw: BTreeMap<String, LabelEncoder> = read_json(path)?;

    let mut set = LabelEncoderSet::new();
    for (name, encoder) in raw {
        let Some(feature) = Feature::from_name(&name) else {
            tracing::warn!("Skipping encoder for unknown feature '{}' in {:?}", name, path);
            continue;
        };
        encoder
            .validate()
            .map_err(|e| ArtifactError::invalid(path, e))?;
        set.insert(feature, encoder);
    }

    tracing::info!("Loaded {} label encoders from {:?}", set.len(), path);
    Ok(set)
}

/// Load the fitted scaler
pub fn open_scaler(path: &Path) -> ArtifactResult<FittedScaler> {
    let scaler: FittedScaler = read_json(path)?;
    scaler
        .validate()
        .map_err(|e| ArtifactError::invalid(path, e))?;

    tracing::info!("Loaded {} scaler from {:?}", scaler.kind_name(), path);
    Ok(scaler)
}

/// Load the fitted classifier
pub fn open_model(path: &Path) -> ArtifactResult<LogisticModel> {
    let model: LogisticModel = read_json(path)?;
    model
        .validate()
        .map_err(|e| ArtifactError::invalid(path, e))?;

    tracing::info!("Loaded classifier from {:?}", path);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::{CategoryEncoder, Classifier, Scaler};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = open_model(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
        assert!(err.to_string().contains("/nonexistent/model.json"));
        assert_eq!(err.path(), Some(Path::new("/nonexistent/model.json")));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_temp_json("{ not json");
        let err = open_scaler(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn test_open_encoders_skips_unknown() {
        let file = write_temp_json(
            r#"{
                "Contract": {"classes": ["Month-to-month", "One year", "Two year"]},
                "Churn Label": {"classes": ["No", "Yes"]}
            }"#,
        );
        let set = open_encoders(file.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.encode(Feature::Contract, "Two year"), Some(2));
    }

    #[test]
    fn test_open_encoders_rejects_duplicates() {
        let file = write_temp_json(r#"{"Partner": {"classes": ["No", "No"]}}"#);
        let err = open_encoders(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_open_scaler_validates() {
        let file = write_temp_json(r#"{"kind": "standard", "mean": [0.0, 1.0], "scale": [1.0]}"#);
        let err = open_scaler(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));

        let file = write_temp_json(r#"{"kind": "min_max", "min": [0.0], "scale": [0.5]}"#);
        assert_eq!(open_scaler(file.path()).unwrap().n_features(), 1);
    }

    #[test]
    fn test_open_model() {
        let file = write_temp_json(
            r#"{"classes": ["No", "Yes"], "coefficients": [[0.5, -0.5]], "intercepts": [0.1]}"#,
        );
        let model = open_model(file.path()).unwrap();
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.classes(), &["No", "Yes"]);
    }
}
