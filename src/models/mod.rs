//! Model artifacts, encoders and inference

pub mod encoder;
pub mod inference;
pub mod loader;
pub mod predictor;

pub use encoder::{Encoder, EncoderMap, LabelEncoder};
pub use inference::PredictionResult;
pub use loader::{ArtifactLoader, ArtifactTriad};
pub use predictor::{OnnxPredictorLoader, Predictor, PredictorLoader};
