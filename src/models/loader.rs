//! Artifact loader: predictor, feature order and encoders for one model

use crate::error::{CostError, EncoderLoadFailure, Result};
use crate::models::encoder::{parse_label_encoders, EncoderMap};
use crate::models::predictor::{Predictor, PredictorLoader};
use crate::registry::ModelId;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything needed to run one model
pub struct ArtifactTriad {
    pub model: ModelId,
    pub predictor: Box<dyn Predictor>,
    /// Feature names in the order the predictor expects them
    pub features: Vec<String>,
    pub encoders: EncoderMap,
}

impl fmt::Debug for ArtifactTriad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut encoded: Vec<_> = self.encoders.keys().collect();
        encoded.sort();
        f.debug_struct("ArtifactTriad")
            .field("model", &self.model)
            .field("features", &self.features)
            .field("encoders", &encoded)
            .finish_non_exhaustive()
    }
}

/// On-disk locations of a model's three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub predictor: PathBuf,
    pub features: PathBuf,
    pub encoders: PathBuf,
}

impl ArtifactPaths {
    pub fn for_model(models_dir: &Path, model: ModelId) -> Self {
        Self {
            predictor: models_dir.join(format!("model_sr{}.onnx", model)),
            features: models_dir.join(format!("model_sr{}_features.json", model)),
            encoders: models_dir.join(format!("model_sr{}_encoders.json", model)),
        }
    }
}

/// Loads artifact triads from a models directory
pub struct ArtifactLoader {
    models_dir: PathBuf,
    predictor_loader: Box<dyn PredictorLoader>,
}

impl ArtifactLoader {
    pub fn new<P: Into<PathBuf>>(models_dir: P, predictor_loader: Box<dyn PredictorLoader>) -> Self {
        Self {
            models_dir: models_dir.into(),
            predictor_loader,
        }
    }

    /// Load a fresh triad. Predictor and feature list are required; encoders are not.
    pub fn load(&self, model: ModelId) -> Result<ArtifactTriad> {
        let paths = ArtifactPaths::for_model(&self.models_dir, model);

        if !paths.predictor.exists() {
            return Err(CostError::ArtifactMissing {
                path: paths.predictor,
            });
        }
        let predictor = self.predictor_loader.load_predictor(&paths.predictor, model)?;

        let features = load_feature_order(&paths.features)?;

        let encoders = match load_encoders(&paths.encoders) {
            Ok(encoders) => encoders,
            Err(failure) => {
                // Categorical fields will reach assembly unencoded
                warn!(
                    model = %model,
                    reason = %failure,
                    "Encoder artifact unusable, continuing without encoders"
                );
                EncoderMap::new()
            }
        };

        info!(
            model = %model,
            features = features.len(),
            encoders = encoders.len(),
            "Artifacts loaded"
        );

        Ok(ArtifactTriad {
            model,
            predictor,
            features,
            encoders,
        })
    }
}

fn load_feature_order(path: &Path) -> Result<Vec<String>> {
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CostError::ArtifactMissing {
            path: path.to_path_buf(),
        },
        _ => CostError::corrupt(path, e),
    })?;

    serde_json::from_str(&json).map_err(|e| CostError::corrupt(path, e))
}

fn load_encoders(path: &Path) -> std::result::Result<EncoderMap, EncoderLoadFailure> {
    let json = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => EncoderLoadFailure::NotFound(path.to_path_buf()),
        _ => EncoderLoadFailure::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    parse_label_encoders(&json).map_err(|source| EncoderLoadFailure::Parse {
        path: path.to_path_buf(),
        source,
    })
}
