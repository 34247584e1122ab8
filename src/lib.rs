//! Cylinder Cost Estimator Library
//!
//! A single-page cost predictor for hydraulic cylinder models. Each model
//! ships an ONNX regressor, its ordered feature list and optional label
//! encoders; the form collects one value per feature and the assembled
//! vector is run through the regressor.

pub mod config;
pub mod error;
pub mod feature_assembler;
pub mod fields;
pub mod form;
pub mod models;
pub mod page;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{CostError, Result};
pub use feature_assembler::FeatureAssembler;
pub use fields::{FieldSpec, FieldSpecStore, NumericRange};
pub use form::{InputForm, Widget};
pub use models::{ArtifactLoader, ArtifactTriad, Encoder, LabelEncoder, Predictor, PredictionResult};
pub use registry::{ModelEntry, ModelId, ModelRegistry};
pub use session::{Session, SessionPhase};
pub use types::{FeatureVector, InputSnapshot, RawValue};
