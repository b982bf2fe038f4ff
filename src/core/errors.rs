//! Error types for the image predictor.
//!
//! Every failure the predictor can hit is reported through [`PredError`]:
//! missing model artifacts, engine calls that return a non-zero status,
//! caller contract violations such as a wrongly sized image buffer, and
//! predictions requested before a model has been loaded.

use crate::core::config::ConfigError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenient result alias used across the crate.
pub type PredResult<T> = Result<T, PredError>;

/// Enum representing the errors that can occur while loading a model or
/// running a prediction.
#[derive(Error, Debug)]
pub enum PredError {
    /// A file required by the caller does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The path that could not be opened.
        path: PathBuf,
    },

    /// A model artifact could not be loaded or the engine rejected it.
    #[error("failed to load model from '{}': {message}", path.display())]
    ModelLoadFailed {
        /// The artifact or model directory involved.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The image buffer does not match the predictor geometry.
    #[error("invalid input size: expected {expected} values, got {actual}")]
    InvalidInputSize {
        /// `width * height * channels` of the predictor.
        expected: usize,
        /// Length of the buffer that was passed in.
        actual: usize,
    },

    /// A prediction was requested before `load_model` succeeded.
    #[error("model not loaded: call load_model before predicting")]
    NotLoaded,

    /// `load_model` was called on a predictor that already holds a model.
    #[error("model already loaded")]
    AlreadyLoaded,

    /// The winning output index has no entry in the label table.
    #[error("class index {index} out of range for label table of {len} entries")]
    LabelIndexOutOfRange {
        /// Index selected from the output vector.
        index: usize,
        /// Number of labels available.
        len: usize,
    },

    /// A call into the inference engine returned a failure status.
    #[error("engine call {call} failed with status {code}: {message}")]
    Engine {
        /// Name of the engine function.
        call: &'static str,
        /// Raw status code returned by the engine.
        code: i32,
        /// Last error message reported by the engine.
        message: String,
    },

    /// The forward pass produced something the predictor cannot interpret.
    #[error("inference: {message}")]
    Inference {
        /// A message describing the problem.
        message: String,
    },

    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Invalid predictor configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl PredError {
    /// Creates a `ModelLoadFailed` error without an underlying cause.
    ///
    /// # Arguments
    ///
    /// * `path` - The artifact or directory that failed to load.
    /// * `message` - A description of the failure.
    pub fn model_load_error(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ModelLoadFailed {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `ModelLoadFailed` error that wraps an underlying cause.
    ///
    /// # Arguments
    ///
    /// * `path` - The artifact or directory that failed to load.
    /// * `message` - A description of the failure.
    /// * `error` - The error that caused the failure.
    pub fn model_load_error_with_source(
        path: impl AsRef<Path>,
        message: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoadFailed {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates an `Engine` error for a failed engine call.
    pub fn engine_error(call: &'static str, code: i32, message: impl Into<String>) -> Self {
        Self::Engine {
            call,
            code,
            message: message.into(),
        }
    }

    /// Creates an `InvalidInputSize` error.
    pub fn invalid_input_size(expected: usize, actual: usize) -> Self {
        Self::InvalidInputSize { expected, actual }
    }

    /// Creates an `Inference` error.
    pub fn inference_error(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Maps an IO error on `path` to `FileNotFound` when the file is missing
    /// and to `Io` otherwise.
    pub fn from_io(path: impl AsRef<Path>, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.as_ref().to_path_buf(),
            }
        } else {
            Self::Io(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_not_found() {
        let err = PredError::from_io(
            "/missing/mean.nd",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, PredError::FileNotFound { .. }));
        assert!(err.to_string().contains("/missing/mean.nd"));
    }

    #[test]
    fn test_from_io_other() {
        let err = PredError::from_io(
            "mean.nd",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, PredError::Io(_)));
    }

    #[test]
    fn test_model_load_error_keeps_source() {
        let inner = PredError::FileNotFound {
            path: PathBuf::from("model/mean.nd"),
        };
        let err = PredError::model_load_error_with_source("model/mean.nd", "read failed", inner);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("file not found: model/mean.nd"));
    }

    #[test]
    fn test_engine_error_message() {
        let err = PredError::engine_error("MXPredForward", -1, "bad shape");
        assert_eq!(
            err.to_string(),
            "engine call MXPredForward failed with status -1: bad shape"
        );
    }
}
