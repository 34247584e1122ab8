//! Error types for model selection, artifact loading and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the user from a single interaction.
///
/// Every variant aborts the current action only; the session stays usable.
#[derive(Debug, Error)]
pub enum CostError {
    /// Model label is not in the registry
    #[error("unknown model selection '{label}'")]
    InvalidSelection { label: String },

    /// A required artifact (predictor or feature list) does not exist
    #[error("required artifact not found: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// A required artifact exists but could not be read or parsed
    #[error("artifact {} is unusable: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Value is not one of the encoder's known categories
    #[error("'{value}' is not a known category for {feature}")]
    Encoding { feature: String, value: String },

    /// Snapshot and feature order disagree in length
    #[error("expected {expected} input values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Submitted form value does not fit the field's widget
    #[error("invalid value '{value}' for {feature}")]
    InvalidInput { feature: String, value: String },

    /// Predictor failed at runtime, or its input could not be made numeric
    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl CostError {
    /// Short machine-readable tag, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSelection { .. } => "invalid_selection",
            Self::ArtifactMissing { .. } => "artifact_missing",
            Self::ArtifactCorrupt { .. } => "artifact_corrupt",
            Self::Encoding { .. } => "encoding_error",
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Prediction(_) => "prediction_error",
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ArtifactCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Why the optional encoder artifact could not be used.
///
/// Never returned to callers: the loader logs it and continues with no encoders.
#[derive(Debug, Error)]
pub enum EncoderLoadFailure {
    #[error("encoder artifact not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read encoder artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse encoder artifact {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CostError>;
