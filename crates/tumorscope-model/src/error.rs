use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing required file: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid artifact {}: {source}", path.display())]
    InvalidArtifact {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("inconsistent model bundle: {0}")]
    Inconsistent(String),

    #[error("{stage} expects {expected} features, got {got}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("y contains previously unseen labels: [{0}]")]
    UnknownClass(i64),
}
