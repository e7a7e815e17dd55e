//! churn-io - Artifact loading and configuration
//!
//! This crate reads the fitted artifacts a churn pipeline needs:
//!
//! - **Encoders**: one label encoder per categorical feature
//! - **Scaler**: standard or min-max column scaling
//! - **Model**: logistic regression coefficients and class labels
//!
//! # Design
//!
//! Artifacts are read once at startup by [`load_pipeline`]. Every failure
//! names the file it came from and is fatal; there is no partial pipeline.

pub mod artifact;
pub mod config;
pub mod error;
pub mod loader;

pub use artifact::*;
pub use config::*;
pub use error::*;
pub use loader::*;
