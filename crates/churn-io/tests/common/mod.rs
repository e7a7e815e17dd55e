//! Test fixture loading utilities

use std::path::{Path, PathBuf};

/// Directory holding a complete, consistent artifact set
pub fn artifact_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join("artifacts")
}

/// Copy the fixture artifacts into `dir` so tests can break individual files
pub fn copy_artifacts(dir: &Path) {
    for name in ["model.json", "scaler.json", "label_encoders.json"] {
        std::fs::copy(artifact_dir().join(name), dir.join(name))
            .unwrap_or_else(|_| panic!("Failed to copy fixture: {}", name));
    }
}
