//! Configuration for churn prediction
//!
//! Loaded from TOML:
//!
//! ```toml
//! [artifacts]
//! dir = "/srv/churn"
//! model = "model.json"
//! scaler = "scaler.json"
//! encoders = "label_encoders.json"
//!
//! [logging]
//! filter = "info"
//! ```
//!
//! Every field is optional. `CHURN_ARTIFACT_DIR` overrides `artifacts.dir`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::error::ConfigError;

/// Environment variable overriding the artifact directory
pub const ARTIFACT_DIR_ENV: &str = "CHURN_ARTIFACT_DIR";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnConfig {
    /// Where the fitted artifacts live
    pub artifacts: ArtifactConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Artifact locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory the file names below are relative to
    pub dir: PathBuf,
    pub model: String,
    pub scaler: String,
    pub encoders: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            model: ArtifactKind::Model.default_file_name().to_string(),
            scaler: ArtifactKind::Scaler.default_file_name().to_string(),
            encoders: ArtifactKind::Encoders.default_file_name().to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Resolved paths of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoders: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        ArtifactConfig {
            dir: dir.to_path_buf(),
            ..ArtifactConfig::default()
        }
        .paths()
    }
}

impl ArtifactConfig {
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.dir.join(&self.model),
            scaler: self.dir.join(&self.scaler),
            encoders: self.dir.join(&self.encoders),
        }
    }
}

impl ChurnConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Per-user config location, `~/.churn/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".churn").join("config.toml"))
    }

    /// Load configuration from standard locations
    ///
    /// An explicit path must exist. Without one, the per-user file is used
    /// when present, otherwise defaults. The environment override is applied
    /// last and the result validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!("Loading config from {:?}", path);
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        if let Ok(dir) = std::env::var(ARTIFACT_DIR_ENV) {
            config.apply_artifact_dir(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Point the artifacts at another directory
    pub fn apply_artifact_dir(&mut self, dir: impl Into<PathBuf>) {
        self.artifacts.dir = dir.into();
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        self.artifacts.paths()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("artifacts.model", &self.artifacts.model),
            ("artifacts.scaler", &self.artifacts.scaler),
            ("artifacts.encoders", &self.artifacts.encoders),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.filter must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ChurnConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.artifact_paths().encoders,
            PathBuf::from("./label_encoders.json")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ChurnConfig::from_toml(
            r#"
[artifacts]
dir = "/srv/churn"
model = "best_model.json"
"#,
        )
        .unwrap();

        let paths = config.artifact_paths();
        assert_eq!(paths.model, PathBuf::from("/srv/churn/best_model.json"));
        assert_eq!(paths.scaler, PathBuf::from("/srv/churn/scaler.json"));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = ChurnConfig::default();
        config.logging.filter = "churn_core=debug".to_string();
        let toml = config.to_toml().unwrap();
        let parsed = ChurnConfig::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut config = ChurnConfig::default();
        config.artifacts.scaler = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ChurnConfig::default();
        config.logging.filter.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[logging]\nfilter = \"warn\"\n").unwrap();
        file.flush().unwrap();

        let config = ChurnConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = ChurnConfig::load(Some(Path::new("/nonexistent/churn.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_paths_in_dir() {
        let paths = ArtifactPaths::in_dir(Path::new("/models"));
        assert_eq!(paths.model, PathBuf::from("/models/model.json"));
    }
}
