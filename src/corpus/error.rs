//! Error types for corpus loading and bundle assembly

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a corpus or assembling bundles.
///
/// Per-line parse problems and link validation failures are not errors;
/// they are collected as warning strings and logged. Only missing required
/// resources surface here.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unknown corpus: {name}. Available corpora: {available}")]
    UnknownCorpus { name: String, available: String },

    #[error("corpus directory not found: {0}")]
    MissingCorpusDir(PathBuf),

    #[error("ground truth file not found: {0}")]
    GroundTruthNotFound(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
