//! CLI errors and their exit codes

use std::path::PathBuf;

use churn_core::InferenceError;
use churn_io::{ArtifactError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error loading config: {0}")]
    Config(#[from] ConfigError),

    #[error("Error loading files: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Failed to read input {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input {}: {source}", .path.display())]
    InputFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error during prediction: {0}")]
    Prediction(#[from] InferenceError),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code
    ///
    /// 2 means nothing was served: config or artifacts are unusable.
    /// 1 means a single request failed.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) | CliError::Artifact(_) => 2,
            CliError::Prediction(e) if e.is_fatal() => 2,
            _ => 1,
        }
    }
}
