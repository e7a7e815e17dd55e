//! Error types for artifact loading

use std::path::{Path, PathBuf};

use churn_core::{InferenceError, ModelError};
use thiserror::Error;

/// Result type for artifact operations
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Failure to load one of the fitted artifacts
///
/// Every variant is fatal: a process that hits one must stop before serving.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid parameters in {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("Artifacts do not fit together: {0}")]
    Misconfigured(#[source] InferenceError),
}

impl ArtifactError {
    pub(crate) fn invalid(path: &Path, source: ModelError) -> Self {
        ArtifactError::Invalid {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the offending file, when the failure belongs to one
    pub fn path(&self) -> Option<&Path> {
        match self {
            ArtifactError::NotFound { path }
            | ArtifactError::Unreadable { path, .. }
            | ArtifactError::Malformed { path, .. }
            | ArtifactError::Invalid { path, .. } => Some(path),
            ArtifactError::Misconfigured(_) => None,
        }
    }
}

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
