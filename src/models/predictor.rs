//! Predictor capability and its ONNX Runtime implementation

use crate::error::{CostError, Result};
use crate::registry::ModelId;
use anyhow::Context;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// A trained regressor taking one ordered feature vector
pub trait Predictor: Send + Sync + fmt::Debug {
    fn predict(&self, features: &[f64]) -> Result<f64>;
}

/// Builds a predictor from the artifact on disk.
///
/// The artifact loader checks that the file exists before calling this.
pub trait PredictorLoader: Send + Sync {
    fn load_predictor(&self, path: &Path, model: ModelId) -> Result<Box<dyn Predictor>>;
}

/// ONNX regressor session
pub struct OnnxPredictor {
    /// Session needs exclusive access to run
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model: ModelId,
}

impl fmt::Debug for OnnxPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxPredictor")
            .field("model", &self.model)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        use ort::value::Tensor;

        // Shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_tensor = Tensor::from_array((shape, data))
            .map_err(|e| CostError::Prediction(format!("failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| CostError::Prediction(format!("lock error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| CostError::Prediction(e.to_string()))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            CostError::Prediction(format!("model produced no '{}' output", self.output_name))
        })?;

        let (_shape, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| CostError::Prediction(format!("unexpected output type: {}", e)))?;

        let estimate = values
            .first()
            .copied()
            .ok_or_else(|| CostError::Prediction("model returned an empty output".to_string()))?;

        debug!(model = %self.model, estimate = estimate, "ONNX inference complete");
        Ok(estimate as f64)
    }
}

/// Loader for ONNX regressors
pub struct OnnxPredictorLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl OnnxPredictorLoader {
    /// Initialize ONNX Runtime and create a loader with the given thread count
    pub fn with_threads(onnx_threads: usize) -> anyhow::Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    fn build_session(&self, path: &Path) -> anyhow::Result<Session> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;
        Ok(session)
    }
}

impl PredictorLoader for OnnxPredictorLoader {
    fn load_predictor(&self, path: &Path, model: ModelId) -> Result<Box<dyn Predictor>> {
        info!(model = %model, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = self
            .build_session(path)
            .map_err(|e| CostError::corrupt(path, format!("{:#}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // Regressors exported from scikit-learn name their single output "variable"
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            model = %model,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Box::new(OnnxPredictor {
            session: Mutex::new(session),
            input_name,
            output_name,
            model,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Linear(Vec<f64>);

    impl Predictor for Linear {
        fn predict(&self, features: &[f64]) -> Result<f64> {
            if features.len() != self.0.len() {
                return Err(CostError::Prediction("shape mismatch".to_string()));
            }
            Ok(features.iter().zip(&self.0).map(|(x, w)| x * w).sum())
        }
    }

    #[test]
    fn test_predictor_trait_object() {
        let predictor: Box<dyn Predictor> = Box::new(Linear(vec![2.0, 1.0]));
        assert_eq!(predictor.predict(&[250.0, 0.0]).unwrap(), 500.0);
        assert!(predictor.predict(&[1.0]).is_err());
    }
}
