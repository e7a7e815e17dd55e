//! One-shot pipeline loading

use churn_core::{Classifier, FittedScaler, LabelEncoderSet, LogisticModel, Pipeline, Scaler};

use crate::artifact::{open_encoders, open_model, open_scaler};
use crate::config::ArtifactPaths;
use crate::error::{ArtifactError, ArtifactResult};

/// Pipeline backed by artifacts read from disk
pub type LoadedPipeline = Pipeline<LabelEncoderSet, FittedScaler, LogisticModel>;

/// Load all three artifacts and check they fit the feature record
///
/// Nothing is returned unless every artifact loaded and the scaler and
/// classifier widths match the record, so a caller never serves with a
/// partial pipeline.
pub fn load_pipeline(paths: &ArtifactPaths) -> ArtifactResult<LoadedPipeline> {
    let classifier = open_model(&paths.model)?;
    let scaler = open_scaler(&paths.scaler)?;
    let encoders = open_encoders(&paths.encoders)?;

    let pipeline = Pipeline::new(encoders, scaler, classifier);
    pipeline
        .check_shapes()
        .map_err(ArtifactError::Misconfigured)?;

    tracing::info!(
        "Pipeline ready: {} encoders, {} scaler columns, classes {:?}",
        pipeline.encoders().len(),
        pipeline.scaler().n_features(),
        pipeline.classifier().classes()
    );
    Ok(pipeline)
}
