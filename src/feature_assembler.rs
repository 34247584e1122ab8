//! Feature vector assembly for cost model inference.
//!
//! Turns the raw form values into the numeric vector the predictor was
//! trained on, applying the per-feature categorical encoders exported with
//! the model.

use crate::error::{CostError, Result};
use crate::models::encoder::EncoderMap;
use crate::types::{FeatureVector, InputSnapshot, RawValue};
use tracing::debug;

/// Assembles model input vectors from raw values.
///
/// Stateless: the same features, snapshot and encoders always give the same vector.
pub struct FeatureAssembler;

impl FeatureAssembler {
    /// Create a new feature assembler.
    pub fn new() -> Self {
        Self
    }

    /// Build the feature vector.
    ///
    /// Each value goes through its feature's encoder when one exists and
    /// passes through unchanged otherwise. Output order matches `features`.
    pub fn assemble(
        &self,
        features: &[String],
        snapshot: &InputSnapshot,
        encoders: &EncoderMap,
    ) -> Result<FeatureVector> {
        if features.len() != snapshot.len() {
            return Err(CostError::ShapeMismatch {
                expected: features.len(),
                actual: snapshot.len(),
            });
        }

        let mut vector = Vec::with_capacity(features.len());

        for (feature, raw) in features.iter().zip(snapshot.iter()) {
            let value = match encoders.get(feature) {
                Some(encoder) => encoder.transform(raw).ok_or_else(|| CostError::Encoding {
                    feature: feature.clone(),
                    value: raw.to_string(),
                })?,
                None => match raw {
                    RawValue::Number(n) => *n,
                    RawValue::Category(value) => {
                        return Err(CostError::Prediction(format!(
                            "'{}' for {} is categorical but no encoder is loaded for it",
                            value, feature
                        )))
                    }
                },
            };
            vector.push(value);
        }

        debug!(
            features = features.len(),
            encoded = encoders.len(),
            vector = ?vector,
            "Feature vector assembled"
        );

        Ok(FeatureVector(vector))
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new()
    }
}
