//! Type definitions shared across the estimator

pub mod input;

pub use input::{FeatureVector, InputSnapshot, RawValue};
